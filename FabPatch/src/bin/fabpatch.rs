fn main() -> anyhow::Result<()> {
    fabpatch::cli::run_cli()
}
