use std::collections::HashMap;

use anyhow::{ensure, Result};

use crate::error::QuestScriptError;

/// Handle into the bank; copies are cheap and stay valid for the whole
/// `assemble` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegRef(usize);

#[derive(Debug, Default)]
struct Register {
    name: Option<String>,
    number: Option<u8>,
    prev: Option<usize>,
    next: Option<usize>,
    /// code offsets whose byte receives the resolved number
    patches: Vec<usize>,
}

/// All registers of one `assemble` invocation: numeric registers pinned to
/// their number, named registers to be solved, anonymous members of fixed
/// sets. Adjacency is a doubly-linked chain; solving walks the chain to a
/// pinned neighbor or places the whole chain in a free window.
#[derive(Debug, Default)]
pub(crate) struct RegisterBank {
    entries: Vec<Register>,
    by_name: HashMap<String, usize>,
    by_number: HashMap<u8, usize>,
}

fn conflict(message: impl Into<String>) -> anyhow::Error {
    QuestScriptError::RegisterConflict(message.into()).into()
}

impl RegisterBank {
    /// `rN`: repeated uses of one number are the same register.
    pub(crate) fn numeric(&mut self, number: u8) -> RegRef {
        if let Some(&idx) = self.by_number.get(&number) {
            return RegRef(idx);
        }
        let idx = self.entries.len();
        self.entries.push(Register {
            number: Some(number),
            ..Register::default()
        });
        self.by_number.insert(number, idx);
        RegRef(idx)
    }

    /// `r:name` / `r:name@N`: repeated uses of one name are the same
    /// register; a second, different pin is a conflict.
    pub(crate) fn named(
        &mut self,
        name: &str,
        pin: Option<u8>,
    ) -> Result<RegRef> {
        if let Some(&idx) = self.by_name.get(name) {
            if let Some(pin) = pin {
                match self.entries[idx].number {
                    Some(old) if old != pin => {
                        return Err(conflict(format!(
                            "r:{name} pinned to both {old} and {pin}"
                        )));
                    }
                    Some(_) => {}
                    None => self.pin(idx, pin)?,
                }
            }
            return Ok(RegRef(idx));
        }
        let idx = self.entries.len();
        self.entries.push(Register {
            name: Some(name.to_owned()),
            ..Register::default()
        });
        self.by_name.insert(name.to_owned(), idx);
        if let Some(pin) = pin {
            self.pin(idx, pin)?;
        }
        Ok(RegRef(idx))
    }

    /// Unnamed member of a fixed set, e.g. the two implied successors in
    /// `foo r:a` where `foo` takes three consecutive registers.
    pub(crate) fn anonymous(&mut self) -> RegRef {
        let idx = self.entries.len();
        self.entries.push(Register::default());
        RegRef(idx)
    }

    fn pin(&mut self, idx: usize, number: u8) -> Result<()> {
        if let Some(&other) = self.by_number.get(&number) {
            if other != idx {
                return Err(conflict(format!(
                    "register slot {number} is already taken"
                )));
            }
        }
        self.entries[idx].number = Some(number);
        self.by_number.insert(number, idx);
        Ok(())
    }

    pub(crate) fn record_patch(&mut self, r: RegRef, offset: usize) {
        self.entries[r.0].patches.push(offset);
    }

    pub(crate) fn number_of(&self, r: RegRef) -> Option<u8> {
        self.entries[r.0].number
    }

    /// Require `next = (prev + 1) mod 256`.
    pub(crate) fn constrain(
        &mut self,
        prev: RegRef,
        next: RegRef,
    ) -> Result<()> {
        if prev == next {
            return Err(conflict("register cannot follow itself"));
        }
        match self.entries[prev.0].next {
            Some(old) if old != next.0 => {
                return Err(conflict(
                    "register already has a different successor",
                ))
            }
            _ => {}
        }
        match self.entries[next.0].prev {
            Some(old) if old != prev.0 => {
                return Err(conflict(
                    "register already has a different predecessor",
                ))
            }
            _ => {}
        }
        self.entries[prev.0].next = Some(next.0);
        self.entries[next.0].prev = Some(prev.0);
        if let (Some(a), Some(b)) =
            (self.entries[prev.0].number, self.entries[next.0].number)
        {
            ensure!(
                b == a.wrapping_add(1),
                conflict(format!("r{b} cannot directly follow r{a}"))
            );
        }
        Ok(())
    }

    /// Number every register: back-compute from a pinned neighbor where a
    /// chain has one, otherwise place the chain in a contiguous free
    /// window. Then verify the §invariants and patch the emitted code.
    pub(crate) fn assign_all(&mut self, code: &mut [u8]) -> Result<()> {
        for idx in 0..self.entries.len() {
            if self.entries[idx].number.is_some() {
                continue;
            }
            if let Some(number) = self.solve_from_neighbors(idx)? {
                self.pin(idx, number)?;
            } else {
                self.place_chain(idx)?;
            }
        }

        // post-conditions: all assigned, unique slots, adjacency holds
        let mut used: HashMap<u8, usize> = HashMap::new();
        for (idx, entry) in self.entries.iter().enumerate() {
            let number = entry.number.ok_or_else(|| {
                conflict(match &entry.name {
                    Some(name) => format!("r:{name} was never assigned"),
                    None => "anonymous register was never assigned".into(),
                })
            })?;
            if let Some(other) = used.insert(number, idx) {
                ensure!(
                    other == idx,
                    conflict(format!("slot {number} assigned twice"))
                );
            }
            if let Some(next) = entry.next {
                let next_number =
                    self.entries[next].number.unwrap_or(number.wrapping_add(1));
                ensure!(
                    next_number == number.wrapping_add(1),
                    conflict(format!(
                        "adjacency broken between r{number} and r{next_number}"
                    ))
                );
            }
            for &offset in &entry.patches {
                code[offset] = number;
            }
        }
        Ok(())
    }

    /// Walk forward, then backward, for a numbered chain member; the
    /// distance gives this register's number.
    fn solve_from_neighbors(&self, idx: usize) -> Result<Option<u8>> {
        let mut distance = 0u16;
        let mut cursor = idx;
        while let Some(next) = self.entries[cursor].next {
            distance += 1;
            ensure!(distance <= 0x100, conflict("register chain too long"));
            if let Some(number) = self.entries[next].number {
                return Ok(Some(
                    number.wrapping_sub((distance & 0xFF) as u8),
                ));
            }
            cursor = next;
        }
        distance = 0;
        cursor = idx;
        while let Some(prev) = self.entries[cursor].prev {
            distance += 1;
            ensure!(distance <= 0x100, conflict("register chain too long"));
            if let Some(number) = self.entries[prev].number {
                return Ok(Some(
                    number.wrapping_add((distance & 0xFF) as u8),
                ));
            }
            cursor = prev;
        }
        Ok(None)
    }

    /// No pinned neighbor anywhere: find the chain head and place the
    /// whole chain in the lowest contiguous free window.
    fn place_chain(&mut self, idx: usize) -> Result<()> {
        let mut head = idx;
        let mut steps = 0u16;
        while let Some(prev) = self.entries[head].prev {
            steps += 1;
            ensure!(steps <= 0x100, conflict("register chain too long"));
            head = prev;
        }
        let mut members = vec![head];
        let mut cursor = head;
        while let Some(next) = self.entries[cursor].next {
            members.push(next);
            ensure!(
                members.len() <= 0x100,
                conflict("register chain too long")
            );
            cursor = next;
        }

        let length = members.len();
        let window = (0..=(0x100 - length)).find(|&start| {
            (start..start + length)
                .all(|slot| !self.by_number.contains_key(&(slot as u8)))
        });
        let Some(start) = window else {
            return Err(conflict(format!(
                "no free window of {length} register slot(s)"
            )));
        };
        for (i, &member) in members.iter().enumerate() {
            self.pin(member, (start + i) as u8)?;
        }
        Ok(())
    }
}
