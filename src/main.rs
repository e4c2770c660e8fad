fn main() -> anyhow::Result<()> {
    blockdoc::run()
}
