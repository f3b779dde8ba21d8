/// Crate `config` provides solver's configuration and CLI.
use {
    std::{path::PathBuf, str::FromStr},
    structopt::StructOpt,
};

/// Restart policy selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RestartMode {
    /// restart every `rst_geo_base * rst_geo_fct^k` conflicts.
    Geometric,
    /// restart on the Luby series scaled by `rst_step`.
    Luby,
    /// force by the fast/slow LBD average ratio, block by the assignment rate.
    Glue,
}

impl FromStr for RestartMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "geometric" | "geo" => Ok(RestartMode::Geometric),
            "luby" => Ok(RestartMode::Luby),
            "glue" | "lbd" => Ok(RestartMode::Glue),
            _ => Err(format!("unknown restart mode: {s}")),
        }
    }
}

/// Decision polarity selector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PolarityMode {
    PosFirst,
    NegFirst,
    Random,
    /// saved phase, with a rare random flip.
    Automatic,
}

impl FromStr for PolarityMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" | "pos" => Ok(PolarityMode::PosFirst),
            "false" | "neg" => Ok(PolarityMode::NegFirst),
            "random" | "rnd" => Ok(PolarityMode::Random),
            "auto" => Ok(PolarityMode::Automatic),
            _ => Err(format!("unknown polarity mode: {s}")),
        }
    }
}

/// Configuration built from command line options
#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "resol", about, author)]
pub struct Config {
    //
    //## I/O configuration
    //
    /// CNF file in DIMACS format
    #[structopt(parse(from_os_str))]
    pub cnf_file: PathBuf,

    /// Disable coloring
    #[structopt(long = "no-color", short = "C")]
    pub no_color: bool,

    /// Disable any progress message
    #[structopt(long = "quiet", short = "q")]
    pub quiet_mode: bool,

    /// Uses Glucose-like progress report
    #[structopt(long = "log", short = "l")]
    pub use_log: bool,

    /// Output directory
    #[structopt(long = "dir", short = "o", default_value = ".", parse(from_os_str))]
    pub output_dir: PathBuf,

    /// Cert. file in DRUP format
    #[structopt(long = "proof", short = "p", default_value = "proof.drup", parse(from_os_str))]
    pub proof_file: PathBuf,

    /// Result filename/stdout
    #[structopt(long = "result", short = "r", default_value = "", parse(from_os_str))]
    pub result_file: PathBuf,

    /// Writes a DRUP UNSAT certification file
    #[structopt(long = "certify", short = "c")]
    pub use_certification: bool,

    //
    //## clause DB
    //
    /// Soft limit of #clauses (0 = no limit)
    #[structopt(long = "cl", default_value = "0")]
    pub clause_limit: usize,

    /// Clause reduction switch
    #[structopt(long = "RDC", default_value = "1")]
    reduce: i32,

    /// #learnts to start the first reduction
    #[structopt(long = "rds", default_value = "2000")]
    pub rdc_start: usize,

    /// Increment of the reduction interval
    #[structopt(long = "rdi", default_value = "300")]
    pub rdc_inc: usize,

    /// Glue protection threshold in reduction
    #[structopt(long = "rdg", default_value = "4")]
    pub rdc_lbd_thr: u16,

    //
    //## eliminator
    //
    /// Pre/in-processor switch
    #[structopt(long = "PRO", default_value = "1")]
    elim: i32,

    /// Max #lit for clause subsume
    #[structopt(long = "ecl", default_value = "32")]
    pub elim_cls_lim: usize,

    /// Grow limit of #cls in var elimination
    #[structopt(long = "evl", default_value = "0")]
    pub elim_grw_lim: usize,

    /// Max #cls for var elimination
    #[structopt(long = "evo", default_value = "10000")]
    pub elim_var_occ: usize,

    /// #conflicts between inprocessing runs
    #[structopt(long = "et", default_value = "10000")]
    pub elim_trigger: usize,

    /// Aggressive resolvent screening through binary clauses
    #[structopt(long = "EAG", default_value = "0")]
    elim_aggressive: i32,

    //
    //## bounded variable addition
    //
    /// Bounded variable addition switch
    #[structopt(long = "BVA", default_value = "1")]
    bva: i32,

    /// Max #rounds of variable addition per inprocessing run
    #[structopt(long = "bvl", default_value = "8")]
    pub bva_lim: usize,

    //
    //## var replacement, component splitting, probing, renumbering
    //
    /// Equivalent-literal replacement switch
    #[structopt(long = "RPL", default_value = "1")]
    replace: i32,

    /// Component splitting switch
    #[structopt(long = "SPT", default_value = "1")]
    split: i32,

    /// Conflict budget of a component sub-solver
    #[structopt(long = "spb", default_value = "20000")]
    pub spt_budget: usize,

    /// Failed-literal probing switch
    #[structopt(long = "PRB", default_value = "1")]
    probe: i32,

    /// Max #probes per inprocessing run
    #[structopt(long = "pbl", default_value = "1000")]
    pub prb_lim: usize,

    /// Inner variable renumbering switch
    #[structopt(long = "RNM", default_value = "1")]
    renumber: i32,

    //
    //## restarter
    //
    /// Restart policy: geometric, luby or glue
    #[structopt(long = "rst", default_value = "glue")]
    pub rst_mode: RestartMode,

    /// #conflicts between restarts
    #[structopt(long = "rs", default_value = "50")]
    pub rst_step: usize,

    /// Base interval of geometric restart
    #[structopt(long = "rgb", default_value = "100.0")]
    pub rst_geo_base: f64,

    /// Scaling factor of geometric restart
    #[structopt(long = "rgf", default_value = "1.5")]
    pub rst_geo_fct: f64,

    /// Length for assignment average
    #[structopt(long = "ral", default_value = "3500")]
    pub rst_asg_len: usize,

    /// Blocking restart threshold; Glucose's R
    #[structopt(long = "rab", default_value = "1.40")]
    pub rst_asg_thr: f64,

    /// Length of LBD fast EMA
    #[structopt(long = "rll", default_value = "50")]
    pub rst_lbd_len: usize,

    /// Length of LBD slow EMA
    #[structopt(long = "rls", default_value = "10000")]
    pub rst_lbd_slw: usize,

    /// Forcing restart threshold on the LBD trend; Glucose's K
    #[structopt(long = "rlt", default_value = "1.25")]
    pub rst_lbd_thr: f64,

    //
    //## var rewarding
    //
    /// Var activity decay factor
    #[structopt(long = "vrd", default_value = "0.95")]
    pub vrw_dcy: f64,

    /// Clause activity decay factor
    #[structopt(long = "crd", default_value = "0.999")]
    pub crw_dcy: f64,

    //
    //## solver configuration
    //
    /// Decision polarity: auto, true, false or random
    #[structopt(long = "pol", default_value = "auto")]
    pub pol_mode: PolarityMode,

    /// CPU time limit in sec
    #[structopt(long = "timeout", short = "t", default_value = "5000.0")]
    pub timeout: f64,

    /// Conflict budget (0 = no limit)
    #[structopt(long = "cb", default_value = "0")]
    pub conflict_budget: usize,

    /// Propagation budget (0 = no limit)
    #[structopt(long = "pb", default_value = "0")]
    pub propagation_budget: usize,

    /// Seed of the solver-local random number generator
    #[structopt(long = "seed", default_value = "91648253")]
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cnf_file: PathBuf::new(),
            no_color: true,
            quiet_mode: true,
            use_log: false,
            output_dir: PathBuf::from("."),
            proof_file: PathBuf::from("proof.drup"),
            result_file: PathBuf::new(),
            use_certification: false,
            clause_limit: 0,
            reduce: 1,
            rdc_start: 2000,
            rdc_inc: 300,
            rdc_lbd_thr: 4,
            elim: 1,
            elim_cls_lim: 32,
            elim_grw_lim: 0,
            elim_var_occ: 10_000,
            elim_trigger: 10_000,
            elim_aggressive: 0,
            bva: 1,
            bva_lim: 8,
            replace: 1,
            split: 1,
            spt_budget: 20_000,
            probe: 1,
            prb_lim: 1000,
            renumber: 1,
            rst_mode: RestartMode::Glue,
            rst_step: 50,
            rst_geo_base: 100.0,
            rst_geo_fct: 1.5,
            rst_asg_len: 3500,
            rst_asg_thr: 1.40,
            rst_lbd_len: 50,
            rst_lbd_slw: 10_000,
            rst_lbd_thr: 1.25,
            vrw_dcy: 0.95,
            crw_dcy: 0.999,
            pol_mode: PolarityMode::Automatic,
            timeout: 5000.0,
            conflict_budget: 0,
            propagation_budget: 0,
            seed: 91_648_253,
        }
    }
}

impl<T> From<T> for Config
where
    PathBuf: From<T>,
{
    fn from(path: T) -> Config {
        Config {
            cnf_file: PathBuf::from(path),
            ..Config::default()
        }
    }
}

macro_rules! dispatch {
    // from `0` and `1`
    ($field: expr) => {
        0 != $field
    };
}

impl Config {
    pub fn use_reduce(&self) -> bool {
        dispatch!(self.reduce)
    }
    pub fn use_elim(&self) -> bool {
        dispatch!(self.elim)
    }
    pub fn use_elim_aggressive(&self) -> bool {
        dispatch!(self.elim_aggressive)
    }
    pub fn use_bva(&self) -> bool {
        // definition clauses are not RUP-derivable; keep proofs clean
        dispatch!(self.bva) && !self.use_certification
    }
    pub fn use_replace(&self) -> bool {
        dispatch!(self.replace)
    }
    pub fn use_split(&self) -> bool {
        // moving clauses into a sub-solver cannot be expressed in DRUP
        dispatch!(self.split) && !self.use_certification
    }
    pub fn use_probe(&self) -> bool {
        dispatch!(self.probe)
    }
    pub fn use_renumber(&self) -> bool {
        dispatch!(self.renumber)
    }
    pub fn set_switches(&mut self, elim: bool, bva: bool, replace: bool, split: bool, probe: bool) {
        self.elim = elim as i32;
        self.bva = bva as i32;
        self.replace = replace as i32;
        self.split = split as i32;
        self.probe = probe as i32;
    }
    pub fn set_renumber(&mut self, b: bool) {
        self.renumber = b as i32;
    }
    /// derive the configuration of a component sub-solver: quiet, certless,
    /// non-recursive, and bounded by the given conflict budget.
    pub fn for_subsolver(&self, budget: usize, remaining_time: f64) -> Config {
        let mut c = self.clone();
        c.quiet_mode = true;
        c.use_certification = false;
        c.conflict_budget = budget;
        c.timeout = remaining_time.max(1.0);
        c.bva = 0;
        c.split = 0;
        c
    }
}
