use registry_sync::cli::{Args, Runner};

#[tokio::main]
async fn main() {
    let args = Args::parse_args().from_env();

    // Incomplete invocations print guidance and exit cleanly
    if args.missing_required() {
        Args::print_usage();
        return;
    }

    let runner = Runner::new(args);
    if let Err(e) = runner.run().await {
        runner.output().error(&e.to_string());
        std::process::exit(1);
    }
}
