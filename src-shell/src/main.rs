fn main() -> anyhow::Result<()> {
    prekt_lib::run()
}
