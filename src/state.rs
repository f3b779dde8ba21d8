//! Module `state` is a collection of internal data, budgets and the
//! progress reporter.
use {
    crate::{
        assign::AssignStack,
        cdb::{ClauseDB, ClauseRef},
        solver::Restarter,
        types::*,
    },
    std::{
        fmt,
        ops::{Index, IndexMut},
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc,
        },
        time::Instant,
    },
};

/// stat index
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stat {
    /// the number of decisions
    Decision = 0,
    /// conflicts resolved without a decision in between
    NoDecisionConflict,
    /// inprocessing passes
    Simplify,
    /// clauses removed by subsumption
    Subsume,
    /// literals removed by strengthening
    Strengthen,
    /// vars eliminated by resolution
    Eliminate,
    /// vars collapsed by equivalence
    Replace,
    /// vars solved in component sub-solvers
    Decompose,
    /// components handled separately
    Component,
    /// failed literals found by probing
    FailedLiteral,
    /// hyper-binary resolvents added
    HyperBinary,
    /// vars introduced by bounded variable addition
    AddedVar,
    /// inner renumberings
    Renumber,
    /// don't use this dummy.
    EndOfStatIndex,
}

impl Index<Stat> for State {
    type Output = usize;
    #[inline]
    fn index(&self, i: Stat) -> &usize {
        &self.stats[i as usize]
    }
}

impl IndexMut<Stat> for State {
    #[inline]
    fn index_mut(&mut self, i: Stat) -> &mut usize {
        &mut self.stats[i as usize]
    }
}

/// API for state/statistics management and reporting.
pub trait StateIF {
    /// return `true` if it is timed out.
    fn is_timeout(&self) -> bool;
    /// return `true` if the caller raised the interrupt flag.
    fn is_interrupted(&self) -> bool;
    /// return `true` if a conflict or propagation budget ran out.
    fn budget_exhausted(&self, asg: &AssignStack) -> bool;
    /// write a header of stat data to stdout.
    fn progress_header(&mut self);
    /// write stat data to stdout.
    fn progress(&mut self, asg: &AssignStack, cdb: &ClauseDB, rst: &Restarter, mes: Option<&str>);
    /// write a one-line message as log.
    fn flush<S: AsRef<str>>(&self, mes: S);
}

/// A collection of internal data, budgets and reporting gear.
#[derive(Debug)]
pub struct State {
    /// solver configuration
    pub config: Config,
    /// false once the formula is known to be unsatisfiable on its own
    pub ok: bool,
    /// collection of statistics data
    pub stats: [usize; Stat::EndOfStatIndex as usize],
    /// EMA of backjump levels
    pub b_lvl: Ema,
    /// EMA of conflict levels
    pub c_lvl: Ema,
    /// the learnt clause under construction
    pub new_learnt: Vec<Lit>,
    /// on-the-fly strengthenings found in analysis, applied after backjump
    pub otf_queue: Vec<(ClauseRef, Lit)>,
    /// the final conflict clause of an assumption run (negated assumptions)
    pub conflicts: Vec<Lit>,
    /// assumption literals of the ongoing call, `(inner, outer-as-passed)`
    pub assumed_pairs: Vec<(Lit, Lit)>,
    /// the extended outer model of the last SAT answer
    pub model: Vec<Option<bool>>,
    /// problem description
    pub target: CNFDescription,
    /// the birth time of this solver
    pub start: Instant,
    /// cooperative cancellation, settable from another thread
    pub interrupt: Arc<AtomicBool>,
    /// `num_conflict` at the last inprocessing run
    pub last_simplify: usize,
    progress_cnt: usize,
    record: ProgressRecord,
}

impl Default for State {
    fn default() -> State {
        State {
            config: Config::default(),
            ok: true,
            stats: [0; Stat::EndOfStatIndex as usize],
            b_lvl: Ema::new(5_000),
            c_lvl: Ema::new(5_000),
            new_learnt: Vec::new(),
            otf_queue: Vec::new(),
            conflicts: Vec::new(),
            assumed_pairs: Vec::new(),
            model: Vec::new(),
            target: CNFDescription::default(),
            start: Instant::now(),
            interrupt: Arc::new(AtomicBool::new(false)),
            last_simplify: 0,
            progress_cnt: 0,
            record: ProgressRecord::default(),
        }
    }
}

impl Instantiate for State {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> State {
        State {
            config: config.clone(),
            target: cnf.clone(),
            ..State::default()
        }
    }
    fn handle(&mut self, e: SolverEvent) {
        if e == SolverEvent::Reinitialize {
            self.conflicts.clear();
            self.assumed_pairs.clear();
            self.start = Instant::now();
        }
    }
}

macro_rules! im {
    ($format: expr, $state: expr, $key: expr, $val: expr) => {
        match ($val, $key) {
            (v, LogUsizeId::End) => format!($format, v),
            (v, k) => {
                let ptr = &mut $state.record.vali[k as usize];
                if $state.config.no_color {
                    *ptr = v;
                    format!($format, *ptr)
                } else if v < *ptr {
                    *ptr = v;
                    format!("\x1B[031m{}\x1B[000m", format!($format, *ptr))
                } else if *ptr < v {
                    *ptr = v;
                    format!("\x1B[001m{}\x1B[000m", format!($format, *ptr))
                } else {
                    format!($format, *ptr)
                }
            }
        }
    };
}

macro_rules! fm {
    ($format: expr, $state: expr, $key: expr, $val: expr) => {
        match ($val, $key) {
            (v, LogF64Id::End) => format!($format, v),
            (v, k) => {
                let ptr = &mut $state.record.valf[k as usize];
                if $state.config.no_color {
                    *ptr = v;
                    format!($format, *ptr)
                } else if v < *ptr {
                    *ptr = v;
                    format!("\x1B[031m{}\x1B[000m", format!($format, *ptr))
                } else if *ptr < v {
                    *ptr = v;
                    format!("\x1B[001m{}\x1B[000m", format!($format, *ptr))
                } else {
                    format!($format, *ptr)
                }
            }
        }
    };
}

impl StateIF for State {
    fn is_timeout(&self) -> bool {
        self.config.timeout < self.start.elapsed().as_secs_f64()
    }
    fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }
    fn budget_exhausted(&self, asg: &AssignStack) -> bool {
        (0 < self.config.conflict_budget && self.config.conflict_budget <= asg.num_conflict)
            || (0 < self.config.propagation_budget
                && self.config.propagation_budget <= asg.num_propagation)
    }
    fn progress_header(&mut self) {
        if self.config.quiet_mode {
            return;
        }
        if self.config.use_log {
            self.dump_header();
            return;
        }
        println!("{self}");
        for _ in 0..5 {
            println!("                                                  ");
        }
    }
    fn progress(&mut self, asg: &AssignStack, cdb: &ClauseDB, rst: &Restarter, mes: Option<&str>) {
        if self.config.quiet_mode {
            return;
        }
        if self.config.use_log {
            self.dump(asg, cdb, rst, mes);
            return;
        }
        let nv = asg.num_vars;
        let fixed = asg.num_asserted_vars;
        let sum = fixed + asg.num_eliminated_vars;
        self.progress_cnt += 1;
        print!("\x1B[6A\x1B[1G");
        println!("{}, Mode:{:>9}", self, mes.unwrap_or("search"));
        println!(
            " #conflict:{}, #decision:{}, #propagate:{}",
            im!("{:>11}", self, LogUsizeId::Conflict, asg.num_conflict),
            im!("{:>13}", self, LogUsizeId::Decision, self[Stat::Decision]),
            im!("{:>15}", self, LogUsizeId::Propagate, asg.num_propagation),
        );
        println!(
            "  Assignment|#rem:{}, #fix:{}, #elm:{}, prg%:{}",
            im!("{:>9}", self, LogUsizeId::Remain, nv - sum),
            im!("{:>9}", self, LogUsizeId::Fixed, fixed),
            im!("{:>9}", self, LogUsizeId::Eliminated, asg.num_eliminated_vars),
            fm!(
                "{:>9.4}",
                self,
                LogF64Id::Progress,
                (sum as f64) / (nv as f64) * 100.0
            ),
        );
        println!(
            " Clause Kind|Remv:{}, LBD2:{}, Binc:{}, Perm:{}",
            im!("{:>9}", self, LogUsizeId::Removable, cdb.num_learnt),
            im!("{:>9}", self, LogUsizeId::LBD2, cdb.num_lbd2),
            im!(
                "{:>9}",
                self,
                LogUsizeId::Binclause,
                cdb.num_bi_clause + cdb.num_bi_learnt
            ),
            im!("{:>9}", self, LogUsizeId::Permanent, cdb.num_irredundant()),
        );
        println!(
            "     Restart|#BLK:{}, #RST:{}, trnd:{}, eLBD:{}",
            im!("{:>9}", self, LogUsizeId::RestartBlock, rst.num_block),
            im!("{:>9}", self, LogUsizeId::Restart, asg.num_restart),
            fm!("{:>9.4}", self, LogF64Id::Trend, rst.lbd_trend()),
            fm!("{:>9.2}", self, LogF64Id::EmaLBD, rst.lbd_get()),
        );
        println!(
            "    Conflict|aLBD:{}, bjmp:{}, cnfl:{} |#stg:{}",
            fm!("{:>9.2}", self, LogF64Id::AveLBD, rst.lbd_get()),
            fm!("{:>9.2}", self, LogF64Id::BLevel, self.b_lvl.get()),
            fm!("{:>9.2}", self, LogF64Id::CLevel, self.c_lvl.get()),
            im!("{:>9}", self, LogUsizeId::Stage, self[Stat::Simplify]),
        );
    }
    fn flush<S: AsRef<str>>(&self, mes: S) {
        if self.config.quiet_mode || self.config.use_log {
            return;
        }
        // print a message on the previous line
        print!("\x1B[1A\x1B[1G\x1B[2K{}\x1B[1E", mes.as_ref());
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tm = self.start.elapsed().as_secs_f64();
        let vc = format!(
            "{},{}",
            self.target.num_of_variables, self.target.num_of_clauses,
        );
        let fname = match &self.target.pathname {
            CNFIndicator::Void => "(no cnf)".to_string(),
            CNFIndicator::File(f) => f.to_string(),
            CNFIndicator::LitVec(n) => format!("(embedded {n} clauses)"),
        };
        let vclen = vc.len();
        let fnlen = fname.len();
        let width = 43;
        if width < vclen + fnlen {
            write!(f, "{:<w$} |time:{:>9.2}", fname, tm, w = width)
        } else {
            write!(
                f,
                "{}{:>w$} |time:{:>9.2}",
                fname,
                &vc,
                tm,
                w = width - fnlen,
            )
        }
    }
}

impl State {
    /// read and clear the interrupt flag; an honoured interrupt is consumed
    /// so that the next `solve` call runs normally.
    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::Relaxed)
    }
    fn dump_header(&self) {
        println!(
            "c |          RESTARTS           |          ORIGINAL         |              LEARNT              | Progress |\n\
             c |       NB   Blocked  Avg Cfc |    Vars  Clauses Literals |   Red   Learnts    LBD2  Removed |          |\n\
             c ========================================================================================================="
        );
    }
    fn dump(&mut self, asg: &AssignStack, cdb: &ClauseDB, rst: &Restarter, _mes: Option<&str>) {
        self.progress_cnt += 1;
        let nv = asg.num_vars;
        let fixed = asg.num_asserted_vars;
        let sum = fixed + asg.num_eliminated_vars;
        let nrestart = asg.num_restart;
        let ncnfl = asg.num_conflict;
        println!(
            "c | {:>8}  {:>8} {:>8} | {:>7} {:>8} {:>8} |  {:>4}  {:>8} {:>7} {:>8} | {:>6.3} % |",
            nrestart,
            rst.num_block,
            ncnfl / nrestart.max(1),
            nv - sum,
            cdb.num_irredundant(),
            0,
            cdb.num_reduction,
            cdb.num_learnt,
            cdb.num_lbd2,
            ncnfl.saturating_sub(cdb.num_learnt),
            (sum as f32) / (nv as f32) * 100.0,
        );
    }
}

enum LogUsizeId {
    Propagate = 0,
    Decision,
    Conflict,
    Remain,
    Fixed,
    Eliminated,
    Removable,
    LBD2,
    Binclause,
    Permanent,
    RestartBlock,
    Restart,
    Stage,
    End,
}

enum LogF64Id {
    Progress = 0,
    Trend,
    EmaLBD,
    AveLBD,
    BLevel,
    CLevel,
    End,
}

struct ProgressRecord {
    vali: [usize; LogUsizeId::End as usize],
    valf: [f64; LogF64Id::End as usize],
}

impl Default for ProgressRecord {
    fn default() -> ProgressRecord {
        ProgressRecord {
            vali: [0; LogUsizeId::End as usize],
            valf: [0.0; LogF64Id::End as usize],
        }
    }
}

impl fmt::Debug for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ProgressRecord")
    }
}
