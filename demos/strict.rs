//! Example demonstrating checked lookups

use envcast::{Env, EnvError, MapSource};

fn main() -> anyhow::Result<()> {
    let env = Env::with_source(MapSource::from([("port", "-80"), ("workers", "0")]));

    // Zero-value getters cannot tell these apart
    println!("get_uint32(port) = {}", env.get_uint32("port"));
    println!("get_uint32(workers) = {}", env.get_uint32("workers"));
    println!("get_uint32(timeout) = {}", env.get_uint32("timeout"));

    // try_get can
    for key in ["port", "workers", "timeout"] {
        match env.try_get::<u32>(key) {
            Ok(v) => println!("{key}: {v}"),
            Err(EnvError::Missing { key }) => println!("{key}: not set"),
            Err(e) => println!("{key}: {e}"),
        }
    }

    Ok(())
}
