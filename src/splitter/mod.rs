//! Module `splitter` detects disconnected components of the formula and
//! solves them in isolated sub-solvers, stitching their models back
//! through the reconstruction stack.
use {
    crate::{
        assign::{AssignIF, AssignStack},
        cdb::{ClauseDB, ClauseDBIF},
        solver::{Certificate, SatSolverIF, Solver},
        state::{Stat, State, StateIF},
        types::*,
        varmap::VarMap,
    },
    std::collections::BTreeMap,
};

/// union-find over vars; linked by co-occurrence in a clause.
#[derive(Debug)]
struct VarUnionFind {
    parent: Vec<VarId>,
}

impl VarUnionFind {
    fn new(n: usize) -> Self {
        VarUnionFind {
            parent: (0..=n).collect(),
        }
    }
    fn find(&mut self, vi: VarId) -> VarId {
        let mut root = vi;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = vi;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }
    fn union(&mut self, a: VarId, b: VarId) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
    fn join_clause(&mut self, lits: &[Lit]) {
        for w in lits.windows(2) {
            self.union(w[0].vi(), w[1].vi());
        }
    }
}

/// partition the unassigned vars by clause connectivity; solve every
/// component but the largest in a sub-solver, smallest first. A component
/// containing a frozen (assumption) var is left in place.
pub fn split_components(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    vmap: &mut VarMap,
) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    let mut uf = VarUnionFind::new(asg.num_vars);
    let mut clauses: Vec<(Vec<Lit>, bool)> = Vec::new();
    for red in [false, true] {
        for cr in cdb.long_refs(red) {
            let lits = cdb.lits(cr).to_vec();
            uf.join_clause(&lits);
            clauses.push((lits, red));
        }
    }
    for (a, b, red) in cdb.binaries() {
        uf.join_clause(&[a, b]);
        clauses.push((vec![a, b], red));
    }
    for (a, b, c, red) in cdb.ternaries() {
        uf.join_clause(&[a, b, c]);
        clauses.push((vec![a, b, c], red));
    }
    //
    //## component census over live vars
    //
    let mut members: BTreeMap<VarId, Vec<VarId>> = BTreeMap::new();
    for vi in 1..=asg.num_vars {
        if asg.assign(vi).is_some() || asg.var(vi).is(FlagVar::ELIMINATED) {
            continue;
        }
        members.entry(uf.find(vi)).or_default().push(vi);
    }
    if members.len() <= 1 {
        return Ok(());
    }
    let mut comps: Vec<Vec<VarId>> = members.into_values().collect();
    comps.sort_by_key(|vars| vars.len());
    let largest = comps.len() - 1;
    let mut clause_of: BTreeMap<VarId, Vec<(Vec<Lit>, bool)>> = BTreeMap::new();
    for (lits, red) in clauses.into_iter() {
        clause_of
            .entry(uf.find(lits[0].vi()))
            .or_default()
            .push((lits, red));
    }
    for vars in comps[..largest].iter() {
        if vars
            .iter()
            .any(|vi| asg.var(*vi).is(FlagVar::FROZEN))
        {
            continue;
        }
        if 100_000 < vars.len() {
            continue;
        }
        let comp = uf.find(vars[0]);
        let comp_clauses = clause_of.remove(&comp).unwrap_or_default();
        if !solve_component(asg, cdb, state, vmap, vars, &comp_clauses)? {
            // the sub-solver ran out of budget; keep the component inline
            return Ok(());
        }
        state[Stat::Component] += 1;
    }
    Ok(())
}

/// returns `Ok(false)` when the sub-solver gave up within its budget.
fn solve_component(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    vmap: &mut VarMap,
    vars: &[VarId],
    clauses: &[(Vec<Lit>, bool)],
) -> Result<bool, SolverError> {
    //
    //## a renumbered copy of the component
    //
    let mut local: BTreeMap<VarId, usize> = BTreeMap::new();
    for (i, vi) in vars.iter().enumerate() {
        local.insert(*vi, i + 1);
    }
    let sub_config = state.config.for_subsolver(
        state.config.spt_budget,
        state.config.timeout - state.start.elapsed().as_secs_f64(),
    );
    let cnf = CNFDescription {
        num_of_variables: vars.len(),
        num_of_clauses: clauses.len(),
        pathname: CNFIndicator::Void,
    };
    let mut sub = Solver::instantiate(&sub_config, &cnf);
    // the caller's interrupt flag reaches into the sub-solver
    sub.state.interrupt = state.interrupt.clone();
    for (lits, red) in clauses.iter() {
        // redundant clauses are implied; the sub-solver re-derives what it
        // needs and the component stays equivalent without them
        if *red {
            continue;
        }
        let v: Vec<i32> = lits
            .iter()
            .map(|l| {
                let x = local[&l.vi()] as i32;
                if bool::from(*l) {
                    x
                } else {
                    -x
                }
            })
            .collect();
        sub.add_clause(v)?;
    }
    state.flush(format!("solving a component of {} vars...", vars.len()));
    match sub.solve() {
        Ok(Certificate::SAT(model)) => {
            for vi in vars.iter() {
                let value = 0 < model[local[vi] - 1];
                vmap.rcn.push_decomposed(vmap.to_outer(*vi), value);
                asg.handle(SolverEvent::Decompose(*vi));
                state[Stat::Decompose] += 1;
            }
            // the moved clauses have no business in the main solver now
            for (lits, _) in clauses.iter() {
                match lits.len() {
                    2 => cdb.remove_binary(lits[0], lits[1]),
                    3 => cdb.remove_ternary(lits[0], lits[1], lits[2]),
                    _ => (),
                }
            }
            remove_component_longs(cdb, vars);
            Ok(true)
        }
        Ok(Certificate::UNSAT) => Err(SolverError::Inconsistent),
        Err(SolverError::TimeOut) => Ok(false),
        Err(e) => Err(e),
    }
}

fn remove_component_longs(cdb: &mut ClauseDB, vars: &[VarId]) {
    for red in [false, true] {
        for cr in cdb.long_refs(red) {
            if cdb.is_dead(cr) {
                continue;
            }
            if vars.contains(&cdb.lits(cr)[0].vi()) {
                cdb.remove_clause(cr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find() {
        let mut uf = VarUnionFind::new(6);
        uf.join_clause(&[Lit::from(1), Lit::from(-2)]);
        uf.join_clause(&[Lit::from(2), Lit::from(3)]);
        uf.join_clause(&[Lit::from(5), Lit::from(6)]);
        assert_eq!(uf.find(1), uf.find(3));
        assert_eq!(uf.find(5), uf.find(6));
        assert_ne!(uf.find(1), uf.find(5));
        assert_ne!(uf.find(4), uf.find(1));
    }
}
