use std::{env, process};

use anyhow::{bail, Context, Result};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

use feedforward::{ActFn, Network, NetworkConfig, Topology};

fn usage(bin: &str) -> ! {
    eprintln!("Usage: {bin} init <out.json> <LINEAR|LOGISTIC> <size>...");
    eprintln!("       {bin} eval <net.json> <input>...");
    process::exit(1);
}

fn init(path: &str, act_fn: &str, sizes: &[String]) -> Result<()> {
    let act_fn: ActFn = act_fn.parse()?;
    let sizes = sizes
        .iter()
        .map(|s| s.parse::<usize>().with_context(|| format!("invalid layer size {s:?}")))
        .collect::<Result<Vec<_>>>()?;

    let topology = Topology::from_sizes(sizes)?;
    let config = NetworkConfig::default();

    // SEED makes the generated weights reproducible.
    let net = match env::var("SEED") {
        Ok(seed) => {
            let seed = seed.parse().with_context(|| format!("invalid SEED {seed:?}"))?;
            Network::random(topology, act_fn, config, &mut StdRng::seed_from_u64(seed))?
        }
        Err(_) => Network::random(topology, act_fn, config, &mut rand::rng())?,
    };

    net.save(path)?;
    info!("wrote {} parameters to {path}", net.params().len());
    Ok(())
}

fn eval(path: &str, inputs: &[String]) -> Result<()> {
    let net = Network::load(path).with_context(|| format!("cannot load {path}"))?;
    let inputs = inputs
        .iter()
        .map(|s| s.parse::<f64>().with_context(|| format!("invalid input {s:?}")))
        .collect::<Result<Vec<_>>>()?;

    for out in net.forward(&inputs)? {
        println!("{out}");
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let bin = args.first().map(String::as_str).unwrap_or("feedforward");

    if args.len() < 3 {
        usage(bin);
    }

    let path = &args[2];
    match args[1].as_str() {
        "init" => {
            if args.len() < 5 {
                usage(bin);
            }
            init(path, &args[3], &args[4..])
        }
        "eval" => eval(path, &args[3..]),
        mode => bail!("unknown mode: {mode}, use 'init' or 'eval'"),
    }
}
