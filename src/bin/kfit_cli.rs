//! Offline front end for the kfit core.
//!
//! Examples:
//!   kfit-cli fit points.csv 3
//!   kfit-cli draw points.csv --clusters 3 --title "Iris" --out plot.svg
//!   kfit-cli draw points.csv --width 1024 --height 768 --padding 64

use kfit::prelude::*;
use serde::Serialize;
use std::fs;
use std::process;

fn usage() -> ! {
    eprintln!("kfit-cli (k-means fit and SVG plot of 2-D CSV points)");
    eprintln!("Usage: kfit-cli <command> <file.csv> [args]\n");
    eprintln!("Commands:");
    eprintln!("  fit <file.csv> <k> [--seed N]      Print fitted centres as JSON");
    eprintln!("  draw <file.csv> [options]          Write an SVG scatter plot");
    eprintln!("Draw options:");
    eprintln!("  --clusters K                       Overlay K fitted centres (default 0 = none)");
    eprintln!("  --title T                          Plot title (default \"Data\")");
    eprintln!("  --width W | --height H             Canvas size (default 800x600)");
    eprintln!("  --padding P                        Margin around the plot area (default 50)");
    eprintln!("  --out FILE                         Write to FILE instead of stdout");
    process::exit(1);
}

fn make_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    process::exit(1);
}

fn parse_num<T: std::str::FromStr>(flag: &str, v: Option<&String>) -> T {
    let Some(v) = v else {
        make_error(&format!("{flag} needs a value"));
    };
    v.parse()
        .unwrap_or_else(|_| make_error(&format!("{flag} must be a non-negative integer")))
}

#[derive(Serialize)]
struct FitOutput<'a> {
    k: usize,
    iterations: usize,
    inertia: f64,
    centers: &'a [Point],
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        usage();
    }

    let cmd = args[0].as_str();
    let csv = fs::read(&args[1])
        .unwrap_or_else(|e| make_error(&format!("read {}: {e}", args[1])));

    match cmd {
        "fit" => {
            let k: usize = parse_num("k", args.get(2));
            let mut cfg = KMeansConfig::with_k(k);
            if args.get(3).map(String::as_str) == Some("--seed") {
                cfg = cfg.with_seed(parse_num("--seed", args.get(4)));
            }
            if cfg!(feature = "parallel") {
                cfg = cfg.with_tier(ExecutionTier::Parallel);
            }

            let data = parse_csv(&csv).unwrap_or_else(|e| make_error(&e.to_string()));
            let fit = kmeans::fit(&data, &cfg).unwrap_or_else(|e| make_error(&e.to_string()));
            let out = FitOutput {
                k,
                iterations: fit.iterations,
                inertia: fit.inertia,
                centers: &fit.centers,
            };
            match serde_json::to_string_pretty(&out) {
                Ok(s) => println!("{s}"),
                Err(e) => make_error(&format!("serialize: {e}")),
            }
        }
        "draw" => {
            let mut spec = PlotSpec::default();
            let mut clusters = 0usize;
            let mut out_path: Option<String> = None;

            let mut i = 2;
            while i < args.len() {
                let flag = args[i].as_str();
                let value = args.get(i + 1);
                match flag {
                    "--clusters" => clusters = parse_num(flag, value),
                    "--width" => spec.width = parse_num(flag, value),
                    "--height" => spec.height = parse_num(flag, value),
                    "--padding" => spec.padding = parse_num(flag, value),
                    "--title" => {
                        spec.title = value
                            .cloned()
                            .unwrap_or_else(|| make_error("--title needs a value"))
                    }
                    "--out" => {
                        out_path = Some(
                            value
                                .cloned()
                                .unwrap_or_else(|| make_error("--out needs a value")),
                        )
                    }
                    _ => usage(),
                }
                i += 2;
            }

            let svg = if clusters > 0 {
                kfit::fit_draw(&csv, clusters, &spec)
            } else {
                kfit::draw(&csv, &spec)
            }
            .unwrap_or_else(|e| make_error(&e.to_string()));

            match out_path {
                Some(path) => {
                    fs::write(&path, svg)
                        .unwrap_or_else(|e| make_error(&format!("write {path}: {e}")));
                    eprintln!("wrote {path}");
                }
                None => print!("{svg}"),
            }
        }
        _ => usage(),
    }
}
