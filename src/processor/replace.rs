//! Equivalent-literal replacement: strongly connected components of the
//! binary implication graph collapse onto a representative.
use {
    crate::{
        assign::{AssignIF, AssignStack, PropagateIF},
        cdb::{ClauseDB, ClauseDBIF, ClauseRef},
        state::{Stat, State},
        types::*,
        varmap::VarMap,
    },
};

pub fn replace_equivalences(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    state: &mut State,
    vmap: &mut VarMap,
) -> MaybeInconsistent {
    debug_assert_eq!(asg.decision_level(), asg.root_level());
    let n_lits = 2 * (asg.num_vars + 1);
    let usable = |asg: &AssignStack, vi: VarId| {
        asg.assign(vi).is_none()
            && !asg.var(vi).is(FlagVar::ELIMINATED)
            && !asg.var(vi).is(FlagVar::FROZEN)
    };
    //
    //## adjacency of the irredundant binary implication graph
    //
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n_lits];
    for (ord, list) in adj.iter_mut().enumerate().skip(2) {
        let l = Lit::from(ord);
        if !usable(asg, l.vi()) {
            continue;
        }
        for (imp, red) in cdb.binary_links_of(l) {
            if !red && usable(asg, imp.vi()) {
                list.push(usize::from(imp));
            }
        }
    }
    let comps = strongly_connected_components(&adj, |ord| usable(asg, Lit::from(ord).vi()));
    //
    //## representative selection; a polarity clash is a refutation
    //
    let mut rep_of: Vec<Option<Lit>> = vec![None; asg.num_vars + 1];
    let mut processed = vec![false; asg.num_vars + 1];
    for comp in comps.iter() {
        if comp.iter().any(|ord| processed[Lit::from(*ord).vi()]) {
            continue;
        }
        let mut var_seen = vec![];
        for ord in comp.iter() {
            let l = Lit::from(*ord);
            if var_seen.contains(&l.vi()) {
                // x and ¬x in one class; both units are implied through the
                // cycle, which keeps an emitted proof checkable
                cdb.certificate_add_assertion(!l);
                cdb.certificate_add_assertion(l);
                return Err(SolverError::RootLevelConflict((l, AssignReason::None)));
            }
            var_seen.push(l.vi());
        }
        let rep = comp
            .iter()
            .map(|ord| Lit::from(*ord))
            .min_by_key(|l| l.vi())
            .unwrap();
        for ord in comp.iter() {
            let l = Lit::from(*ord);
            processed[l.vi()] = true;
            if l.vi() == rep.vi() {
                continue;
            }
            // l ≡ rep, so var(l) ≡ rep with l's sign folded in
            rep_of[l.vi()] = Some(if bool::from(l) { rep } else { !rep });
        }
    }
    if rep_of.iter().all(|r| r.is_none()) {
        return Ok(());
    }
    let map = |l: Lit| -> Lit {
        match rep_of[l.vi()] {
            Some(r) => {
                if bool::from(l) {
                    r
                } else {
                    !r
                }
            }
            None => l,
        }
    };
    //
    //## rewrite every clause touching a replaced var: install all the
    //## mapped forms first, so the equivalence binaries justifying them
    //## are still attached, then drop the originals
    //
    enum Old {
        Long(ClauseRef),
        Bin(Lit, Lit),
        Tri(Lit, Lit, Lit),
    }
    let mut touched: Vec<(Old, Vec<Lit>, bool)> = Vec::new();
    for red in [false, true] {
        for cr in cdb.long_refs(red) {
            if cdb.is_dead(cr) || !cdb.lits(cr).iter().any(|l| rep_of[l.vi()].is_some()) {
                continue;
            }
            let mapped: Vec<Lit> = cdb.lits(cr).iter().map(|l| map(*l)).collect();
            touched.push((Old::Long(cr), mapped, red));
        }
    }
    for (a, b, red) in cdb.binaries() {
        if rep_of[a.vi()].is_some() || rep_of[b.vi()].is_some() {
            touched.push((Old::Bin(a, b), vec![map(a), map(b)], red));
        }
    }
    for (a, b, c, red) in cdb.ternaries() {
        if rep_of[a.vi()].is_some() || rep_of[b.vi()].is_some() || rep_of[c.vi()].is_some() {
            touched.push((Old::Tri(a, b, c), vec![map(a), map(b), map(c)], red));
        }
    }
    for (_, mapped, red) in touched.iter() {
        install_rewritten(asg, cdb, mapped.clone(), *red)?;
    }
    for (old, _, _) in touched.iter() {
        match old {
            Old::Long(cr) => {
                if !cdb.is_dead(*cr) {
                    cdb.remove_clause(*cr);
                }
            }
            Old::Bin(a, b) => cdb.remove_binary(*a, *b),
            Old::Tri(a, b, c) => cdb.remove_ternary(*a, *b, *c),
        }
    }
    //
    //## retire the replaced vars
    //
    for vi in 1..=asg.num_vars {
        if let Some(r) = rep_of[vi] {
            let outer = vmap.to_outer(vi);
            let rep_outer = vmap.lit_to_outer(r);
            vmap.push_replaced(outer, rep_outer);
            asg.handle(SolverEvent::Replace(vi));
            state[Stat::Replace] += 1;
        }
    }
    if let Some(cc) = asg.propagate(cdb) {
        return Err(SolverError::RootLevelConflict(cc));
    }
    Ok(())
}

/// attach a rewritten clause, which may have collapsed to something shorter.
fn install_rewritten(
    asg: &mut AssignStack,
    cdb: &mut ClauseDB,
    mapped: Vec<Lit>,
    red: bool,
) -> MaybeInconsistent {
    let mut vec: Vec<Lit> = Vec::with_capacity(mapped.len());
    for l in mapped.iter() {
        match asg.assigned(*l) {
            Some(true) => return Ok(()),
            Some(false) => continue,
            None => {
                if vec.contains(&!*l) {
                    return Ok(()); // tautology
                }
                if !vec.contains(l) {
                    vec.push(*l);
                }
            }
        }
    }
    match vec.len() {
        0 => Err(SolverError::RootLevelConflict((
            mapped[0],
            AssignReason::None,
        ))),
        1 => {
            cdb.certificate_add_assertion(vec[0]);
            asg.assign_at_root_level(vec[0])
        }
        _ => {
            cdb.new_clause(asg, &mut vec, red);
            Ok(())
        }
    }
}

/// iterative Tarjan; returns only components with at least two members.
fn strongly_connected_components(
    adj: &[Vec<usize>],
    usable: impl Fn(usize) -> bool,
) -> Vec<Vec<usize>> {
    let n = adj.len();
    let mut next_index: u32 = 1;
    let mut index = vec![0u32; n];
    let mut low = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut call: Vec<(usize, usize)> = Vec::new();
    let mut comps: Vec<Vec<usize>> = Vec::new();
    for s in 2..n {
        if index[s] != 0 || !usable(s) {
            continue;
        }
        index[s] = next_index;
        low[s] = next_index;
        next_index += 1;
        stack.push(s);
        on_stack[s] = true;
        call.push((s, 0));
        while let Some(frame) = call.last_mut() {
            let v = frame.0;
            if frame.1 < adj[v].len() {
                let w = adj[v][frame.1];
                frame.1 += 1;
                if index[w] == 0 {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
            } else {
                call.pop();
                if let Some(up) = call.last() {
                    low[up.0] = low[up.0].min(low[v]);
                }
                if low[v] == index[v] {
                    let mut comp = Vec::new();
                    loop {
                        let w = stack.pop().expect("broken SCC stack");
                        on_stack[w] = false;
                        comp.push(w);
                        if w == v {
                            break;
                        }
                    }
                    if 1 < comp.len() {
                        comps.push(comp);
                    }
                }
            }
        }
    }
    comps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scc_cycle() {
        // lits 2 → 4 → 6 → 2 form one class; 8 hangs off it
        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); 10];
        adj[2] = vec![4];
        adj[4] = vec![6];
        adj[6] = vec![2, 8];
        let mut comps = strongly_connected_components(&adj, |_| true);
        assert_eq!(comps.len(), 1);
        comps[0].sort_unstable();
        assert_eq!(comps[0], vec![2, 4, 6]);
    }
}
