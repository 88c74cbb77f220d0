use clap::{arg, command, Parser, Subcommand};
use crossterm::{
    cursor::{MoveLeft, MoveRight, MoveUp},
    execute,
    style::{Attribute, Color as TermColor, SetBackgroundColor, Stylize},
};
use cfop::{
    constants::{
        PASS1_EXPLORATION, PASS1_ITERATIONS, PASS2_EXPLORATION, PASS2_ITERATIONS, SCRAMBLE_LENGTH,
        SEQUENCE_DEPTH,
    },
    cubie::CubieCube,
    facelet::{Color, FaceCube},
    heuristic::{table_path, HeuristicTable},
    scramble::{scramble as gen_scramble, scramble_from_str, scramble_to_str},
    solver::{solve as cfop_solve, SolverConfig},
    Error,
};
use log::info;
use spinners::Spinner;
use std::{
    io::{self, stdout},
    time::{Duration, Instant},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "solves the cube with the CFOP method")]
    #[clap(group(
    clap::ArgGroup::new("state")
        .required(true)
        .args(&["scramble", "facelet"]),
    ))]
    Solve {
        #[arg(short, long)]
        scramble: Option<String>,

        #[arg(short, long)]
        facelet: Option<String>,

        /// Iterations of the first search pass
        #[arg(long, default_value_t = PASS1_ITERATIONS)]
        pass1: usize,

        /// Iterations of the second search pass
        #[arg(long, default_value_t = PASS2_ITERATIONS)]
        pass2: usize,

        /// Exploration constant of the first pass
        #[arg(long, default_value_t = PASS1_EXPLORATION)]
        c1: f64,

        /// Exploration constant of the second pass
        #[arg(long, default_value_t = PASS2_EXPLORATION)]
        c2: f64,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Hash whole cube states instead of masking the last layer
        #[arg(long)]
        full_hash: bool,

        /// Depth of the sequence hash
        #[arg(short, long, default_value_t = SEQUENCE_DEPTH)]
        depth: usize,

        /// Search time limit in seconds
        #[arg(short, long)]
        timeout: Option<f64>,

        /// Directory of the cached tables
        #[arg(long, default_value = "tables")]
        tables: String,

        #[arg(short, long)]
        verbose: bool,

        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "generates scramble")]
    Scramble {
        #[arg(short, long, default_value_t = SCRAMBLE_LENGTH)]
        length: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long)]
        preview: bool,
    },

    #[command(about = "precomputes and saves the heuristic table")]
    Tables {
        #[arg(long)]
        full_hash: bool,

        #[arg(short, long, default_value_t = SEQUENCE_DEPTH)]
        depth: usize,

        #[arg(long, default_value = "tables")]
        dir: String,
    },
}

fn solve(
    scramble: &Option<String>,
    facelet: &Option<String>,
    config: &SolverConfig,
    tables: &str,
    verbose: bool,
    preview: bool,
) -> Result<(), Error> {
    let state = if let Some(scramble) = scramble {
        CubieCube::from(&scramble_from_str(scramble)?)
    } else if let Some(facelet) = facelet {
        CubieCube::try_from(facelet.as_str())?
    } else {
        return Ok(());
    };
    if preview {
        print_facelet(&FaceCube::from(&state))?;
    }

    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Loading tables".to_owned());
    let table = HeuristicTable::load_or_create(tables, config.wildcard, config.sequence_depth)?;
    spinner.stop_with_newline();

    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Solving".to_owned());
    let result = cfop_solve(&table, state, config)?;
    let end = Instant::now();
    spinner.stop_with_newline();

    if !result.solved {
        let styled = "F2L not found:".with(TermColor::Yellow).attribute(Attribute::Bold);
        println!(
            "{styled} {:?}, closest state after {} moves",
            result.f2l.status,
            result.f2l.moves.len()
        );
    }
    println!("Cross + F2L: {}", scramble_to_str(&result.f2l.moves)?);
    println!("Last layer: {}", scramble_to_str(&result.last_layer)?);
    println!("Solution: {}", scramble_to_str(&result.solution)?);
    println!("Move count: {}", result.solution.len());
    if verbose {
        let stats = result.f2l.stats;
        println!(
            "Search: {} nodes, {} visited, {} iterations",
            stats.nodes, stats.visited, stats.iterations
        );
        println!("Search time: {:?}", result.f2l.solve_time);
    }
    println!("Solve time: {:?}", result.solve_time);
    println!("Total time: {:?}", end - start);
    if preview {
        print_facelet(&FaceCube::from(&result.final_state))?;
    }

    Ok(())
}

fn color_to_termcolor(color: Color) -> TermColor {
    match color {
        Color::U => TermColor::DarkYellow,
        Color::R => TermColor::Magenta,
        Color::F => TermColor::Green,
        Color::D => TermColor::White,
        Color::L => TermColor::Red,
        Color::B => TermColor::Blue,
    }
}

fn print_face(face: &[Color], offset: u16) -> Result<(), io::Error> {
    for i in 0..3 {
        let layer = format!(
            "{}  {}  {}  {}",
            SetBackgroundColor(color_to_termcolor(face[3 * i])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 1])),
            SetBackgroundColor(color_to_termcolor(face[(3 * i) + 2])),
            SetBackgroundColor(TermColor::Reset)
        );

        println!("{layer}");

        if offset != 0 {
            execute!(stdout(), MoveRight(offset))?;
        }
    }

    Ok(())
}

fn print_facelet(facelet: &FaceCube) -> Result<(), io::Error> {
    let stdout = stdout();

    println!();
    execute!(&stdout, MoveRight(6))?;
    print_face(&facelet.f[0..9], 6)?; // U
    execute!(&stdout, MoveLeft(6))?;
    print_face(&facelet.f[36..45], 0)?; // L
    execute!(&stdout, MoveRight(6), MoveUp(3))?;
    print_face(&facelet.f[18..27], 6)?; // F
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(12))?;
    print_face(&facelet.f[9..18], 12)?; // R
    execute!(&stdout, MoveLeft(12), MoveUp(3), MoveRight(18))?;
    print_face(&facelet.f[45..54], 18)?; // B
    execute!(&stdout, MoveLeft(12))?;
    print_face(&facelet.f[27..36], 6)?; // D
    execute!(&stdout, MoveLeft(12))?;
    println!();

    Ok(())
}

fn scramble(length: usize, seed: Option<u64>, preview: bool) -> Result<(), Error> {
    let scrambled = gen_scramble(length, seed);
    println!("Scramble: {}", scramble_to_str(&scrambled.moves)?);
    println!("Inverse: {}", scramble_to_str(&scrambled.inverse)?);
    println!("Facelets: {}", FaceCube::from(&scrambled.state));
    if preview {
        print_facelet(&FaceCube::from(&scrambled.state))?;
    }
    Ok(())
}

fn tables(full_hash: bool, depth: usize, dir: &str) -> Result<(), Error> {
    let start = Instant::now();
    let mut spinner = Spinner::new(spinners::Spinners::Dots, "Building tables".to_owned());
    let table = HeuristicTable::build(!full_hash, depth)?;
    let path = table_path(dir, !full_hash, depth);
    table.save(&path)?;
    spinner.stop_with_newline();
    info!("{} patterns", table.sequence.len());
    println!("Saved {} ({:?})", path.display(), start.elapsed());
    Ok(())
}

fn main() {
    pretty_env_logger::init();
    let program = Cli::parse();

    let result = match &program.command {
        Some(Commands::Solve {
            scramble,
            facelet,
            pass1,
            pass2,
            c1,
            c2,
            seed,
            full_hash,
            depth,
            timeout,
            tables,
            verbose,
            preview,
        }) => {
            let config = SolverConfig {
                pass1_iters: *pass1,
                pass2_iters: *pass2,
                pass1_exploration: *c1,
                pass2_exploration: *c2,
                seed: *seed,
                wildcard: !*full_hash,
                sequence_depth: *depth,
                timeout: timeout.map(Duration::from_secs_f64),
                ..Default::default()
            };
            solve(scramble, facelet, &config, tables, *verbose, *preview)
        }
        Some(Commands::Scramble {
            length,
            seed,
            preview,
        }) => scramble(*length, *seed, *preview),
        Some(Commands::Tables {
            full_hash,
            depth,
            dir,
        }) => tables(*full_hash, *depth, dir),
        _ => Ok(()),
    };

    if let Err(error) = result {
        let styled = "Error:".with(TermColor::Red).attribute(Attribute::Bold);
        println!("{styled} {error}");
    }
}
