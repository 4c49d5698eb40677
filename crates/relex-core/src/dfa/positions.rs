//! Position calculus for the direct DFA construction: nullable, firstpos,
//! lastpos and followpos, computed in one post-order traversal of the
//! augmented AST.

use std::collections::BTreeSet;
use std::fmt;

use crate::regex::ast::{Ast, LeafKind};
use crate::regex::Action;

pub type PosSet = BTreeSet<usize>;

/// One row per leaf position. Operator nodes only exist transiently during
/// the traversal; followpos is defined for leaves alone.
#[derive(Debug, Clone)]
pub struct PositionRow {
    pub kind: LeafKind,
    pub nullable: bool,
    pub is_final: bool,
    pub firstpos: PosSet,
    pub lastpos: PosSet,
    pub followpos: PosSet,
}

impl PositionRow {
    fn new(pos: usize, kind: LeafKind) -> Self {
        let nullable = matches!(kind, LeafKind::Epsilon);
        let is_final = matches!(kind, LeafKind::End);
        let own: PosSet = if nullable {
            PosSet::new()
        } else {
            PosSet::from([pos])
        };
        Self {
            kind,
            nullable,
            is_final,
            firstpos: own.clone(),
            lastpos: own,
            followpos: PosSet::new(),
        }
    }

    pub fn action(&self) -> Option<&Action> {
        match &self.kind {
            LeafKind::Marker { action, .. } => Some(action),
            _ => None,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, LeafKind::Marker { .. })
    }

    /// The input symbol this row matches, if it matches one at all.
    pub fn symbol(&self) -> Option<char> {
        match self.kind {
            LeafKind::Char(c) => Some(c),
            _ => None,
        }
    }
}

/// Dense table of position rows, indexed by leaf id.
#[derive(Debug)]
pub struct PositionTable {
    rows: Vec<PositionRow>,
    root_firstpos: PosSet,
}

impl PositionTable {
    pub fn compute(ast: &Ast) -> Self {
        let mut rows: Vec<Option<PositionRow>> = vec![None; ast.leaf_count()];
        collect_leaves(ast, &mut rows);
        let mut rows: Vec<PositionRow> = rows
            .into_iter()
            .map(|row| row.expect("leaf positions are dense"))
            .collect();

        let (_, root_firstpos, _) = visit(ast, &mut rows);
        Self {
            rows,
            root_firstpos,
        }
    }

    pub fn row(&self, pos: usize) -> &PositionRow {
        &self.rows[pos]
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &PositionRow)> {
        self.rows.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// firstpos of the augmented root: the initial DFA state.
    pub fn root_firstpos(&self) -> &PosSet {
        &self.root_firstpos
    }

    /// The input alphabet: every distinct character some leaf matches.
    /// Markers and the end leaf are not part of it.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.rows.iter().filter_map(|r| r.symbol()).collect()
    }
}

fn collect_leaves(ast: &Ast, rows: &mut Vec<Option<PositionRow>>) {
    match ast {
        Ast::Leaf(leaf) => {
            rows[leaf.pos] = Some(PositionRow::new(leaf.pos, leaf.kind.clone()));
        }
        Ast::Cat(a, b) | Ast::Alt(a, b) => {
            collect_leaves(a, rows);
            collect_leaves(b, rows);
        }
        Ast::Star(a) | Ast::Opt(a) => collect_leaves(a, rows),
    }
}

/// Returns `(nullable, firstpos, lastpos)` of the node, accumulating
/// followpos into the leaf rows along the way.
fn visit(ast: &Ast, rows: &mut [PositionRow]) -> (bool, PosSet, PosSet) {
    match ast {
        Ast::Leaf(leaf) => {
            let row = &rows[leaf.pos];
            (row.nullable, row.firstpos.clone(), row.lastpos.clone())
        }
        Ast::Cat(a, b) => {
            let (n1, f1, l1) = visit(a, rows);
            let (n2, f2, l2) = visit(b, rows);
            for &i in &l1 {
                rows[i].followpos.extend(f2.iter().copied());
            }
            let firstpos = if n1 { &f1 | &f2 } else { f1 };
            let lastpos = if n2 { &l1 | &l2 } else { l2 };
            (n1 && n2, firstpos, lastpos)
        }
        Ast::Alt(a, b) => {
            let (n1, f1, l1) = visit(a, rows);
            let (n2, f2, l2) = visit(b, rows);
            (n1 || n2, &f1 | &f2, &l1 | &l2)
        }
        Ast::Star(a) => {
            let (_, first, last) = visit(a, rows);
            for &i in &last {
                rows[i].followpos.extend(first.iter().copied());
            }
            (true, first, last)
        }
        Ast::Opt(a) => {
            let (_, first, last) = visit(a, rows);
            (true, first, last)
        }
    }
}

impl fmt::Display for PositionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:<8} {:<8} {:<5}  followpos", "pos", "symbol", "nullable", "final")?;
        for (pos, row) in self.rows() {
            writeln!(
                f,
                "{:>4}  {:<8} {:<8} {:<5}  {:?}",
                pos,
                row.kind.to_string(),
                row.nullable,
                row.is_final,
                row.followpos,
            )?;
        }
        Ok(())
    }
}
