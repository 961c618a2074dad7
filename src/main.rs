use domset::anytime::{run_anytime, MonotonicClock};
use domset::config::{budget_from_secs, SolveConfig, SolveMode};
use domset::domination::{minimum_dominating_set, Solution};
use domset::format::{write_graph, write_solution, GraphReader};
use domset::graph::Graph;
use domset::portfolio::run_portfolio;
use domset::verify::{check_certificate, check_solution};
use std::io::{self, BufWriter, Read, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    let mut cfg = SolveConfig::default();
    let mut echo = false;
    let mut verify = false;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--exact" => {
                cfg.mode = SolveMode::Exact;
                i += 1;
            }
            "--anytime" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                let secs: f64 = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                cfg.mode = SolveMode::Anytime;
                cfg.budget = budget_from_secs(secs);
                i += 2;
            }
            "--workers" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.workers = v.parse().unwrap_or_else(|_| usage_and_exit(2));
                i += 2;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.seed = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--max-restarts" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.max_restarts = Some(v.parse().unwrap_or_else(|_| usage_and_exit(2)));
                i += 2;
            }
            "--echo" => {
                echo = true;
                i += 1;
            }
            "--verify" => {
                verify = true;
                i += 1;
            }
            "--help" | "-h" => usage_and_exit(0),
            _ => usage_and_exit(2),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("failed to read standard input: {e}");
        std::process::exit(1);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = if verify {
        verify_stream(&input, echo, &mut out)
    } else {
        solve_stream(&input, echo, &cfg, &mut out)
    };

    let code = match result.and_then(|code| out.flush().map(|()| code)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("failed to write output: {e}");
            1
        }
    };
    std::process::exit(code)
}

/// Solves every graph in `input`, returning the process exit code.
fn solve_stream<W: Write>(
    input: &str,
    echo: bool,
    cfg: &SolveConfig,
    out: &mut W,
) -> io::Result<i32> {
    let mut reader = GraphReader::new(input);
    while let Some(parsed) = reader.next_graph() {
        let index = reader.graph_number();
        let graph = match parsed {
            Ok(graph) => graph,
            Err(e) => {
                writeln!(out, "*** Error- {e}")?;
                writeln!(out, "Graph   {index:5}: BAD GRAPH")?;
                return Ok(1);
            }
        };

        if echo {
            write_graph(&mut *out, &graph)?;
        }
        let solution = solve(&graph, cfg);
        if let Err(e) = check_solution(&graph, &solution) {
            tracing::error!(graph = index, error = %e, "solver produced an invalid set");
            return Ok(1);
        }
        write_solution(&mut *out, &solution)?;
    }
    Ok(0)
}

/// Reads graph/certificate pairs and reports whether each certificate
/// dominates its graph.
fn verify_stream<W: Write>(input: &str, echo: bool, out: &mut W) -> io::Result<i32> {
    let mut reader = GraphReader::new(input);
    while let Some(parsed) = reader.next_graph() {
        let index = reader.graph_number();
        let certificate = parsed.and_then(|graph| {
            let members = reader.next_certificate()?;
            Ok((graph, members))
        });
        let (graph, members) = match certificate {
            Ok(pair) => pair,
            Err(e) => {
                writeln!(out, "*** Error- {e}")?;
                writeln!(out, "Graph   {index:5}: BAD GRAPH")?;
                return Ok(1);
            }
        };

        if echo {
            write_graph(&mut *out, &graph)?;
        }
        match check_certificate(&graph, &members) {
            Ok(()) => writeln!(out, "Graph   {index:5}: OK")?,
            Err(e) => {
                writeln!(out, "*** Error- {e}")?;
                writeln!(out, "Graph   {index:5}: BAD CERTIFICATE")?;
            }
        }
    }
    Ok(0)
}

fn solve(graph: &Graph, cfg: &SolveConfig) -> Solution {
    match cfg.mode {
        SolveMode::Exact => minimum_dominating_set(graph),
        SolveMode::Anytime if cfg.workers > 1 => {
            run_portfolio(graph, cfg, &MonotonicClock::start()).solution
        }
        SolveMode::Anytime => run_anytime(graph, cfg).solution,
    }
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  domset [--exact | --anytime SECS] [--workers N] [--seed SEED] [--max-restarts N] [--echo] < graphs\n  domset --verify [--echo] < graphs-with-certificates\n\nOptions:\n  --exact                  Prove a minimum dominating set for each graph (default)\n  --anytime SECS           Randomized restarts; best set found within SECS per graph\n  --workers N              Parallel restart workers in anytime mode (default: auto-detect)\n  --seed SEED              Deterministic base seed (optional)\n  --max-restarts N         Cap on restarts per worker (optional)\n  --echo                   Print each graph before its result\n  --verify                 Check the dominating set given after each graph\n\nLogging goes to stderr and is controlled by RUST_LOG (default: warn).\n"
    );
    std::process::exit(code)
}
