// The `resol` binary: read a DIMACS file, solve, report, exit with the
// conventional code (10 SAT, 20 UNSAT, 0 unknown).
use {
    resol::{
        config::Config,
        solver::{Certificate, SatSolverIF, Solver},
        types::SolverError,
    },
    std::{
        fs::File,
        io::{BufWriter, Write},
        process::exit,
    },
    structopt::StructOpt,
};

fn main() {
    let config = Config::from_args();
    let mut solver = match Solver::build(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("c failed to load {}: {e}", config.cnf_file.display());
            exit(1);
        }
    };
    let res = solver.solve();
    if let Err(e) = save_result(&config, &res) {
        eprintln!("c failed to save the result: {e}");
    }
    match res {
        Ok(Certificate::SAT(model)) => {
            println!("s SATISFIABLE");
            print!("v ");
            for x in model.iter() {
                print!("{x} ");
            }
            println!("0");
            exit(10);
        }
        Ok(Certificate::UNSAT) => {
            println!("s UNSATISFIABLE");
            exit(20);
        }
        Err(SolverError::TimeOut) => {
            println!("s UNKNOWN (timed out)");
            exit(0);
        }
        Err(SolverError::Interrupted) => {
            println!("s UNKNOWN (interrupted)");
            exit(0);
        }
        Err(e) => {
            println!("s UNKNOWN ({e})");
            exit(0);
        }
    }
}

fn save_result(
    config: &Config,
    res: &Result<Certificate, SolverError>,
) -> std::io::Result<()> {
    if config.result_file.as_os_str().is_empty() {
        return Ok(());
    }
    let path = config.output_dir.join(&config.result_file);
    let mut out = BufWriter::new(File::create(path)?);
    match res {
        Ok(Certificate::SAT(model)) => {
            writeln!(out, "SAT")?;
            for x in model.iter() {
                write!(out, "{x} ")?;
            }
            writeln!(out, "0")?;
        }
        Ok(Certificate::UNSAT) => {
            writeln!(out, "UNSAT")?;
        }
        Err(_) => {
            writeln!(out, "INDET")?;
        }
    }
    Ok(())
}
