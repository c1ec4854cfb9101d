use super::{LatchInit, Netlist};
use crate::{
    error::{Error, Result},
    literal::{AigerLit, Lit, MAX_VAR},
};
use std::{fs, io::Read, path::Path, str::FromStr};

struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate(),
        }
    }

    fn next_line(&mut self, what: &str) -> Result<(usize, &'a str)> {
        match self.inner.next() {
            Some((i, l)) => Ok((i + 1, l)),
            None => Err(Error::Format(format!(
                "unexpected end of file, expected {what}"
            ))),
        }
    }

    fn rest(&mut self) -> impl Iterator<Item = (usize, &'a str)> + '_ {
        self.inner.by_ref().map(|(i, l)| (i + 1, l))
    }
}

fn err(line: usize, msg: impl std::fmt::Display) -> Error {
    Error::Format(format!("line {line}: {msg}"))
}

fn number(tok: &str, line: usize) -> Result<u32> {
    tok.parse()
        .map_err(|e| err(line, format!("invalid number '{tok}': {e}")))
}

struct Parser<'a> {
    lines: Lines<'a>,
    maxvar: u32,
}

impl<'a> Parser<'a> {
    fn literal(&self, tok: &str, line: usize) -> Result<Lit> {
        let raw = number(tok, line)?;
        let lit = Lit::from_aiger(raw);
        if *lit.var() > self.maxvar {
            return Err(err(
                line,
                format!("literal {raw} exceeds maximum variable {}", self.maxvar),
            ));
        }
        Ok(lit)
    }

    /// One line holding exactly `n` literals, or between `n` and `max` if given.
    fn literals(&mut self, what: &str, n: usize, max: usize) -> Result<(usize, Vec<Lit>)> {
        let (line, text) = self.lines.next_line(what)?;
        let toks: Vec<&str> = text.split_whitespace().collect();
        if toks.len() < n || toks.len() > max {
            return Err(err(
                line,
                format!("expected {what}, found '{text}'"),
            ));
        }
        let lits = toks
            .iter()
            .map(|t| self.literal(t, line))
            .collect::<Result<Vec<_>>>()?;
        Ok((line, lits))
    }

    fn single(&mut self, what: &str) -> Result<Lit> {
        Ok(self.literals(what, 1, 1)?.1[0])
    }
}

impl Netlist {
    /// Parse an ASCII AIGER 1.9 netlist.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = Lines::new(text);
        let (hline, header) = lines.next_line("header")?;
        let mut fields = header.split_whitespace();
        match fields.next() {
            Some("aag") => {}
            Some("aig") => return Err(err(hline, "binary aiger is not supported")),
            Some(tag) => {
                return Err(err(
                    hline,
                    format!("expected header tag 'aag', got '{tag}'"),
                ));
            }
            None => return Err(err(hline, "empty header")),
        }
        let counts = fields
            .map(|f| number(f, hline))
            .collect::<Result<Vec<u32>>>()?;
        if counts.len() < 5 || counts.len() > 9 {
            return Err(err(
                hline,
                format!("header has {} fields, expected 5 to 9", counts.len()),
            ));
        }
        let count = |i: usize| counts.get(i).copied().unwrap_or(0) as usize;
        let (m, ni, nl, no, na) = (counts[0], count(1), count(2), count(3), count(4));
        let (nb, nc, nj, nf) = (count(5), count(6), count(7), count(8));

        if m > MAX_VAR {
            return Err(err(
                hline,
                format!("maximum variable {m} has no 32-bit literal, the limit is {MAX_VAR}"),
            ));
        }

        // section sizes come from the header, nothing is allocated from them
        let mut n = Netlist::new();
        n.maxvar = m;
        let mut p = Parser { lines, maxvar: m };
        let invariant = |line: usize| move |e: Error| err(line, e);

        for _ in 0..ni {
            let (line, l) = p.literals("input", 1, 1)?;
            n.add_input(l[0], None).map_err(invariant(line))?;
        }
        for _ in 0..nl {
            let (line, l) = p.literals("latch", 2, 3)?;
            let init = match l.get(2) {
                None => LatchInit::Zero,
                Some(&i) if i == Lit::constant(false) => LatchInit::Zero,
                Some(&i) if i == Lit::constant(true) => LatchInit::One,
                Some(&i) if i == l[0] => LatchInit::Uninit,
                Some(i) => {
                    return Err(err(
                        line,
                        format!("invalid latch reset value {}", i.aiger()),
                    ));
                }
            };
            n.add_latch_with_init(l[0], l[1], init, None)
                .map_err(invariant(line))?;
        }
        for _ in 0..no {
            let l = p.single("output")?;
            n.add_output(l, None);
        }
        for _ in 0..nb {
            let l = p.single("bad")?;
            n.add_bad(l, None);
        }
        for _ in 0..nc {
            let l = p.single("constraint")?;
            n.add_constraint(l, None);
        }
        let mut sizes = Vec::new();
        for _ in 0..nj {
            let (line, text) = p.lines.next_line("justice size")?;
            let size = number(text.trim(), line)?;
            if size == 0 {
                return Err(err(line, "empty justice property"));
            }
            sizes.push(size);
        }
        for size in sizes {
            let mut lits = Vec::new();
            for _ in 0..size {
                lits.push(p.single("justice literal")?);
            }
            n.add_justice(lits, None);
        }
        for _ in 0..nf {
            let l = p.single("fairness")?;
            n.add_fairness(l, None);
        }
        for _ in 0..na {
            let (line, l) = p.literals("and gate", 3, 3)?;
            n.add_and(l[0], l[1], l[2]).map_err(invariant(line))?;
        }

        let mut rest = p.lines.rest();
        for (line, text) in rest.by_ref() {
            if text == "c" {
                break;
            }
            if text.trim().is_empty() {
                continue;
            }
            n.parse_symbol(line, text)?;
        }
        for (_, text) in rest {
            n.comments.push(text.to_string());
        }
        n.check()?;
        Ok(n)
    }

    fn parse_symbol(&mut self, line: usize, text: &str) -> Result<()> {
        let Some((tag, name)) = text.split_once(' ') else {
            return Err(err(line, format!("invalid symbol '{text}'")));
        };
        let mut chars = tag.chars();
        let kind = chars.next().unwrap_or(' ');
        let index = number(chars.as_str(), line)? as usize;
        let slot = match kind {
            'i' => self.inputs.get_mut(index).map(|s| &mut s.name),
            'l' => self.latches.get_mut(index).map(|s| &mut s.name),
            'o' => self.outputs.get_mut(index).map(|s| &mut s.name),
            'b' => self.bads.get_mut(index).map(|s| &mut s.name),
            'c' => self.constraints.get_mut(index).map(|s| &mut s.name),
            'j' => self.justice.get_mut(index).map(|s| &mut s.name),
            'f' => self.fairness.get_mut(index).map(|s| &mut s.name),
            _ => return Err(err(line, format!("invalid symbol type '{kind}'"))),
        };
        match slot {
            Some(slot) => {
                *slot = Some(name.to_string());
                Ok(())
            }
            None => Err(err(line, format!("symbol index {tag} out of range"))),
        }
    }

    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

impl FromStr for Netlist {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
