//! Example demonstrating dotted keys and map defaults

use envcast::{Env, MapSource, Value};

fn main() -> anyhow::Result<()> {
    let env = Env::with_source(MapSource::from([("cache.ttl", "120")]));

    // Dotted keys build nested maps
    env.set_default("Cache.TTL", 60);
    env.set_default("Cache.Backend", "memory");

    // Whole maps are lower-cased recursively
    let db = Value::try_from(serde_json::json!({
        "Host": "localhost",
        "Pool": { "Min": 1, "Max": 8 },
    }))?;
    env.set_default("Database", db);

    println!("Defaults: {}", serde_json::to_string_pretty(&env.defaults().to_json())?);

    // Flat lookups see only top-level keys
    println!("get(\"cache.backend\") = {:?}", env.get("cache.backend"));

    // Nested lookups follow the dots, environment first
    println!("cache.ttl = {}", env.get_nested("cache.ttl").coerce::<u32>()?);
    println!("cache.backend = {}", env.get_nested("cache.backend").coerce::<String>()?);
    println!("database.pool.max = {}", env.get_nested("DATABASE.POOL.MAX").coerce::<u8>()?);

    Ok(())
}
