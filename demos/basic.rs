//! Basic usage example

fn main() -> anyhow::Result<()> {
    // Defaults registered at startup
    envcast::set_default("DATABASE_URL", "postgres://localhost/mydb");
    envcast::set_default("SERVER_ADDR", "127.0.0.1:8080");
    envcast::set_default("MAX_CONNECTIONS", 10);
    envcast::set_default("DEBUG_MODE", false);

    // Environment variables are looked up by their lower-cased name
    std::env::set_var("server_addr", "0.0.0.0:3000");

    println!("Configuration loaded:");
    println!("  Database URL: {}", envcast::get_string("DATABASE_URL"));
    println!("  Server Address: {}", envcast::get_string("SERVER_ADDR"));
    println!("  Max Connections: {}", envcast::get_uint32("MAX_CONNECTIONS"));
    println!("  Debug Mode: {}", envcast::get_bool("DEBUG_MODE"));

    Ok(())
}
