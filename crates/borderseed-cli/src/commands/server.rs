pub fn run(host: &str, port: u16) {
    let base = format!("http://{host}:{port}");

    println!("borderseed server v{}", borderseed_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET /                     API index (try: curl {base})");
    println!("     GET /health               Health check");
    println!("     GET /api/v1/candidates    Every valid final word");
    println!("     GET /api/v1/final-word    Final word by number");
    println!("     GET /api/v1/check         Word checker for a full mnemonic");
    println!("     GET /api/v1/extract       Dyadic bits for one die roll");
    println!();
    println!("   Query params:");
    println!("     words=w1+w2+...           Partial or full mnemonic");
    println!("     number=N                  Final word number (1-128 or 1-8)");
    println!("     outcome=N&sides=N         Zero-based roll and die size");
    println!();
    println!("   Examples:");
    println!("     curl '{base}/api/v1/candidates?words=abandon+abandon+abandon+abandon+abandon+abandon+abandon+abandon+abandon+abandon+abandon'");
    println!("     curl '{base}/api/v1/extract?outcome=4&sides=6'");
    println!();

    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| super::exit_with(e));
    if let Err(e) = rt.block_on(borderseed_server::run_server(host, port)) {
        super::exit_with(e);
    }
}
