//! DRUP certificate emission: add, delete, delayed delete and flush events.
use {
    crate::types::*,
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::PathBuf,
    },
};

/// Receives every clause mutation while active and serialises it as a DRUP
/// text proof. Literals are translated to outer numbering through `lit_map`,
/// which tracks renumbering, so one proof stays coherent across inner
/// re-mappings.
#[derive(Debug, Default)]
pub struct CertificationStore {
    target: Option<PathBuf>,
    buffer: Option<BufWriter<File>>,
    /// inner literal ordinal -> outer i32
    lit_map: Vec<i32>,
    /// deletions queued by speculative transformations
    delayed: Vec<Vec<i32>>,
    suspended: bool,
}

impl Clone for CertificationStore {
    fn clone(&self) -> Self {
        CertificationStore::default()
    }
}

impl Instantiate for CertificationStore {
    fn instantiate(config: &Config, cnf: &CNFDescription) -> Self {
        let mut lit_map = vec![0; 2 * (cnf.num_of_variables + 1)];
        for (i, m) in lit_map.iter_mut().enumerate().skip(2) {
            *m = lit_to_i32_identity(i);
        }
        if config.use_certification {
            let cert: PathBuf = config.output_dir.join(&config.proof_file);
            if let Ok(out) = File::create(&cert) {
                return CertificationStore {
                    buffer: Some(BufWriter::new(out)),
                    target: Some(cert),
                    lit_map,
                    ..CertificationStore::default()
                };
            }
        }
        CertificationStore {
            lit_map,
            ..CertificationStore::default()
        }
    }
}

fn lit_to_i32_identity(ordinal: usize) -> i32 {
    if ordinal % 2 == 0 {
        -((ordinal >> 1) as i32)
    } else {
        (ordinal >> 1) as i32
    }
}

impl CertificationStore {
    pub fn is_active(&self) -> bool {
        self.buffer.is_some()
    }
    /// drop events while loading axioms; DRUP records derivations only.
    pub fn suspend(&mut self, b: bool) {
        self.suspended = b;
    }
    /// replace the inner-to-outer literal map after a renumbering.
    pub fn update_map(&mut self, map: Vec<i32>) {
        self.lit_map = map;
    }
    /// register a fresh inner var and its outer i32 id.
    pub fn register_var(&mut self, outer: i32) {
        self.lit_map.push(-outer);
        self.lit_map.push(outer);
    }
    fn map(&self, l: Lit) -> i32 {
        let i = usize::from(l);
        if i < self.lit_map.len() {
            self.lit_map[i]
        } else {
            lit_to_i32_identity(i)
        }
    }
    pub fn add_clause(&mut self, vec: &[Lit]) {
        if self.buffer.is_none() || self.suspended {
            return;
        }
        let line: Vec<i32> = vec.iter().map(|l| self.map(*l)).collect();
        self.write_step(false, &line);
    }
    pub fn add_assertion(&mut self, l: Lit) {
        if self.buffer.is_none() || self.suspended {
            return;
        }
        let line = [self.map(l)];
        self.write_step(false, &line);
    }
    pub fn delete_clause(&mut self, vec: &[Lit]) {
        if self.buffer.is_none() || self.suspended {
            return;
        }
        let line: Vec<i32> = vec.iter().map(|l| self.map(*l)).collect();
        self.write_step(true, &line);
    }
    /// queue a deletion whose fate is not settled yet.
    pub fn delay_delete(&mut self, vec: &[Lit]) {
        if self.buffer.is_none() || self.suspended {
            return;
        }
        let line: Vec<i32> = vec.iter().map(|l| self.map(*l)).collect();
        self.delayed.push(line);
    }
    /// emit queued deletions if the transformation committed, or drop them.
    pub fn flush_delayed(&mut self, commit: bool) {
        let steps = std::mem::take(&mut self.delayed);
        if !commit || self.buffer.is_none() {
            return;
        }
        for line in steps.iter() {
            self.write_step(true, line);
        }
    }
    /// record the empty clause: the refutation is complete.
    pub fn conclude(&mut self) {
        if let Some(ref mut buf) = self.buffer {
            let _ = buf.write_all(b"0\n");
            let _ = buf.flush();
        }
        self.buffer = None;
        self.target = None;
    }
    pub fn close(&mut self) {
        if let Some(ref mut buf) = self.buffer {
            let _ = buf.flush();
        }
        self.buffer = None;
    }
    fn write_step(&mut self, delete: bool, line: &[i32]) {
        if let Some(ref mut buf) = self.buffer {
            let mut ok = true;
            if delete {
                ok = buf.write_all(b"d ").is_ok();
            }
            for x in line {
                ok = ok && buf.write_all(format!("{x} ").as_bytes()).is_ok();
            }
            ok = ok && buf.write_all(b"0\n").is_ok();
            if !ok {
                self.buffer = None;
            }
        }
    }
}
