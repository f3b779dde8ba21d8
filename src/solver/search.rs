//! Conflict-Driven Clause Learning search engine
use {
    super::{
        analyze_final, handle_conflict, renumber_vars,
        restart::{RestartDecision, RestartIF, Restarter},
        Certificate, Solver, SolverResult,
    },
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF, VarSelectIF},
        cdb::{ClauseDB, ClauseDBIF},
        processor::{self, EliminateIF, Eliminator},
        splitter,
        state::{Stat, State, StateIF},
        types::*,
        varmap::VarMap,
    },
};

/// API for the search drivers `solve` and `solve_with`.
pub trait SatSolverSearchIF {
    /// search an assignment.
    ///
    /// # Errors
    ///
    /// if a budget ran out, the caller interrupted, or the solver hit a bug.
    fn solve(&mut self) -> SolverResult;
    /// search an assignment consistent with the assumptions; on UNSAT the
    /// final conflict names the culprit subset of them.
    fn solve_with(&mut self, assumptions: &[i32]) -> SolverResult;
}

macro_rules! final_report {
    ($asg: expr, $cdb: expr, $rst: expr, $state: expr) => {
        if !$state.config.quiet_mode {
            $state.progress($asg, $cdb, $rst, Some("finished"));
        }
    };
}

impl SatSolverSearchIF for Solver {
    fn solve(&mut self) -> SolverResult {
        self.solve_with(&[])
    }
    fn solve_with(&mut self, assumptions: &[i32]) -> SolverResult {
        let Solver {
            ref mut asg,
            ref mut cdb,
            ref mut elim,
            ref mut rst,
            ref mut state,
            ref mut vmap,
        } = self;
        if cdb.check_size().is_err() {
            return Err(SolverError::OutOfMemory);
        }
        state.handle(SolverEvent::Reinitialize);
        asg.cancel_until(asg.root_level);
        if !state.ok {
            // the formula itself was already refuted
            return Ok(Certificate::UNSAT);
        }
        let mut lits: Vec<Lit> = Vec::with_capacity(assumptions.len());
        for i in assumptions.iter() {
            if *i == 0 {
                return Err(SolverError::InvalidLiteral);
            }
            while vmap.num_outer_vars() < i.unsigned_abs() as usize {
                let (outer, _) = vmap.add_var();
                asg.handle(SolverEvent::NewVar);
                cdb.handle(SolverEvent::NewVar);
                cdb.certification_store.register_var(outer as i32);
            }
            match vmap.lit_to_inner(Lit::from(*i)) {
                Some(l) if !asg.var(l.vi()).is(FlagVar::ELIMINATED) => {
                    state.assumed_pairs.push((l, Lit::from(*i)));
                    lits.push(l);
                }
                _ => return Err(SolverError::RemovedVariable),
            }
        }
        asg.set_assumptions(lits);
        state.progress_header();
        state.progress(asg, cdb, rst, Some("initialization"));

        //
        //## Propagate all trivial literals, then simplify (an essential step)
        //
        let mut answer = match presolve(asg, cdb, elim, state, vmap) {
            Ok(()) => {
                asg.rebuild_order();
                state.progress(asg, cdb, rst, None);
                search(asg, cdb, elim, rst, state, vmap)
            }
            Err(e) => Err(e),
        };
        if let Err(SolverError::RootLevelConflict(_))
        | Err(SolverError::EmptyClause)
        | Err(SolverError::Inconsistent) = answer
        {
            state.conflicts.clear();
            answer = Ok(false);
        }
        final_report!(asg, cdb, rst, state);
        let result = match answer {
            Ok(true) => {
                let mut model = vmap.extend_model(&asg.assign_ref());
                for v in model.iter_mut().skip(1) {
                    if v.is_none() {
                        // a var constrained by nothing; any value will do
                        *v = Some(false);
                    }
                }
                let vals = (1..=vmap.num_outer_vars())
                    .filter(|v| !vmap.is_hidden(*v))
                    .map(|v| {
                        if model[v] == Some(true) {
                            v as i32
                        } else {
                            -(v as i32)
                        }
                    })
                    .collect::<Vec<i32>>();
                state.model = model;
                asg.cancel_until(asg.root_level);
                Ok(Certificate::SAT(vals))
            }
            Ok(false) => {
                asg.cancel_until(asg.root_level);
                cdb.certificate_conclude();
                if state.conflicts.is_empty() {
                    // refuted independently of any assumption
                    state.ok = false;
                }
                Ok(Certificate::UNSAT)
            }
            Err(e) => {
                asg.cancel_until(asg.root_level);
                Err(e)
            }
        };
        asg.set_assumptions(Vec::new());
        result
    }
}

/// initial propagation and the first inprocessing pass.
fn presolve(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    vmap: &mut VarMap,
) -> MaybeInconsistent {
    if let Some(cc) = asg.propagate(cdb) {
        state.ok = false;
        return Err(SolverError::RootLevelConflict(cc));
    }
    inprocess(asg, cdb, elim, state, vmap)
}

/// main loop; returns `Ok(true)` for SAT, `Ok(false)` for UNSAT.
fn search(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    rst: &mut Restarter,
    state: &mut State,
    vmap: &mut VarMap,
) -> Result<bool, SolverError> {
    let mut a_decision_was_made = false;
    loop {
        if let Some(cc) = asg.propagate(cdb) {
            if asg.decision_level() == asg.root_level() {
                state.conflicts.clear();
                return Ok(false);
            }
            if a_decision_was_made {
                a_decision_was_made = false;
            } else {
                state[Stat::NoDecisionConflict] += 1;
            }
            match handle_conflict(asg, cdb, rst, state, &cc) {
                Ok(()) => (),
                Err(SolverError::RootLevelConflict(_)) | Err(SolverError::EmptyClause) => {
                    state.conflicts.clear();
                    return Ok(false);
                }
                Err(e) => return Err(e),
            }
            continue;
        }
        //
        //## a propagation fixpoint with no conflict; SAT is only declared
        //## after every assumption level is established below
        //
        if rst.restart() == Some(RestartDecision::Force) {
            asg.cancel_until(asg.root_level);
            rst.handle(SolverEvent::Restart);
            //
            //## budgets are polled only at restart boundaries
            //
            if state.take_interrupt() {
                return Err(SolverError::Interrupted);
            }
            if state.is_timeout() || state.budget_exhausted(asg) {
                return Err(SolverError::TimeOut);
            }
            cdb.reduce(asg);
            if state.config.elim_trigger < asg.num_conflict - state.last_simplify {
                inprocess(asg, cdb, elim, state, vmap)?;
                state.progress(asg, cdb, rst, None);
                asg.rebuild_order();
            }
            continue;
        }
        //
        //## assumptions claim the first decision levels
        //
        let mut final_conflict = false;
        while (asg.decision_level() as usize) < asg.num_assumptions() {
            let a = asg.assumption(asg.decision_level() as usize);
            match asg.assigned(a) {
                Some(true) => asg.begin_vacuous_level(),
                Some(false) => {
                    analyze_final(asg, cdb, state, a);
                    final_conflict = true;
                    break;
                }
                None => {
                    asg.assign_by_decision(a);
                    break;
                }
            }
        }
        if final_conflict {
            return Ok(false);
        }
        if asg.remains() {
            continue;
        }
        if asg.num_vars <= asg.stack_len() + asg.num_eliminated_vars {
            return Ok(true);
        }
        let lit = asg.select_decision_literal();
        asg.assign_by_decision(lit);
        state[Stat::Decision] += 1;
        a_decision_was_made = true;
    }
}

/// one inprocessing episode: root cleaning, equivalence replacement,
/// probing, elimination, variable addition, component splitting and
/// renumbering, each behind its switch.
fn inprocess(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    elim: &mut Eliminator,
    state: &mut State,
    vmap: &mut VarMap,
) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    if state.take_interrupt() {
        return Err(SolverError::Interrupted);
    }
    state[Stat::Simplify] += 1;
    state.last_simplify = asg.num_conflict;
    processor::clean_at_root(asg, cdb)?;
    if state.config.use_replace() {
        state.flush("replacing...");
        processor::replace_equivalences(asg, cdb, state, vmap)?;
        processor::clean_at_root(asg, cdb)?;
    }
    if state.config.use_probe() {
        state.flush("probing...");
        processor::probe(asg, cdb, state)?;
        processor::clean_at_root(asg, cdb)?;
    }
    if state.config.use_elim() && elim.enable {
        state.flush("eliminating...");
        elim.simplify(asg, cdb, state, vmap)?;
    }
    if state.config.use_bva() {
        state.flush("adding variables...");
        processor::add_bounded_vars(asg, cdb, state, vmap)?;
    }
    if state.config.use_split() && asg.num_assumptions() == 0 {
        state.flush("splitting...");
        splitter::split_components(asg, cdb, state, vmap)?;
    }
    if state.config.use_renumber() && asg.num_assumptions() == 0 {
        renumber_vars(asg, cdb, elim, state, vmap);
    }
    cdb.garbage_collect(asg);
    asg.rebuild_order();
    Ok(())
}
