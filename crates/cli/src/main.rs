fn main() -> Result<(), Box<dyn std::error::Error>> {
    scanscope_cli::run()
}
