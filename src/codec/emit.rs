//! GT1Z token emitter.
//!
//! Assembles the compressed byte stream from the operations the chart picks:
//! literals accumulate in a buffer and ride in the header of the next match
//! or control token; matches flush the buffer and encode their offset in
//! short or long form, or omit it entirely when it repeats the previous one.
//! Segment transitions emit a zero-match control token — the one-byte
//! skip-to-next-page form when the new segment starts exactly one page up,
//! otherwise the long form carrying an absolute address (which marks the
//! stream as not relocatable).  The terminator reuses the long form with a
//! zero high byte and carries the entry point.

use crate::codec::types::{encode_short_offset, minus, GT1Z_MAGIC};
use crate::displaylevel;

pub struct Emitter {
    out: Vec<u8>,
    /// Current write address; the low byte advances modulo 256.
    addr: i32,
    /// Start address of the current segment, -1 before the first one.
    segaddr: i32,
    /// Offset used by the most recent match token.
    prev_off: i32,
    /// Literals accumulated since the last flushed token.
    lits: Vec<u8>,
    /// Expected stream length after the current segment, -1 when unset.
    predicted: i64,
    /// Cleared by any long-form segment control after the initial address.
    relocatable: bool,
}

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            out: GT1Z_MAGIC.to_vec(),
            addr: -1,
            segaddr: -1,
            prev_off: 1,
            lits: Vec::new(),
            predicted: -1,
            relocatable: true,
        }
    }

    /// Offset the next match token would reuse for free.
    pub fn prev_off(&self) -> i32 {
        self.prev_off
    }

    /// Bytes emitted so far.
    pub fn written(&self) -> usize {
        self.out.len()
    }

    /// Record the chart's cost for the segment about to be emitted; checked
    /// against the actual stream length at the next segment boundary.
    pub fn predict(&mut self, upcoming_cost: i32) {
        self.predicted = self.out.len() as i64 + i64::from(upcoming_cost);
    }

    /// Buffer literal bytes and advance the write address.
    pub fn literal(&mut self, bytes: &[u8]) {
        self.lits.extend_from_slice(bytes);
        self.addr = (self.addr & 0xff00) + ((self.addr + bytes.len() as i32) & 0xff);
    }

    /// Flush one token: the buffered literals plus a match of `mcnt` bytes at
    /// `off`.  `mcnt` 0 emits a control token (`off` -1 forces the explicit-
    /// offset bit, which in a control token means skip-to-next-page).
    pub fn match_run(&mut self, mcnt: i32, off: i32) {
        debug_assert!(mcnt == 0 || mcnt >= 2);
        debug_assert!(mcnt == 0 || off >= 0);
        let nlits = self.lits.len() as i32;
        let mut token = if nlits < 7 { nlits << 4 } else { 7 << 4 };
        if off != self.prev_off {
            token |= 0x80;
        }
        if mcnt > 0 {
            self.prev_off = off;
        }
        if mcnt >= 2 {
            token |= if mcnt - 1 < 15 { mcnt - 1 } else { 15 };
        }
        self.out.push(token as u8);
        if token & 0x70 == 0x70 {
            self.out.push(nlits as u8); // 256 becomes 0
        }
        displaylevel!(
            3,
            "gt1z:   T={:02x} L{} {}{}:{:#06x}\n",
            token,
            nlits,
            if token & 0x80 != 0 { 'D' } else { 'M' },
            mcnt,
            minus(self.addr, self.prev_off)
        );
        self.out.extend_from_slice(&self.lits);
        self.lits.clear();
        if token & 0x0f == 0x0f {
            self.out.push(mcnt as u8); // 256 becomes 0
        }
        if mcnt > 0 && token & 0x80 != 0 {
            let t = self.addr - self.segaddr;
            match encode_short_offset(off, t) {
                Some(raw) => self.out.push(raw),
                None => {
                    let ohi = (off >> 8) & 0xff;
                    debug_assert!(ohi & 0x80 == 0);
                    self.out.push(ohi as u8);
                    self.out.push(off as u8);
                }
            }
        }
        self.addr = (self.addr & 0xff00) + ((self.addr + mcnt) & 0xff);
    }

    /// Open the segment starting at `newaddr`, closing the previous one with
    /// the appropriate control token.
    pub fn segment(&mut self, newaddr: i32) {
        self.control(newaddr, -1);
        displaylevel!(3, "gt1z: -- {:#06x}\n", newaddr);
    }

    fn control(&mut self, adr: i32, execlo: i32) {
        let mut longseg = true;
        if self.segaddr >= 0 {
            longseg = execlo >= 0 || adr - self.segaddr != 0x100;
            if longseg && execlo < 0 {
                self.relocatable = false;
            }
            self.match_run(0, if longseg { self.prev_off } else { -1 });
            if self.predicted >= 0 && self.out.len() as i64 != self.predicted {
                displaylevel!(
                    2,
                    "gt1z: info: wrote {} bytes where the cost model predicted {}\n",
                    self.out.len(),
                    self.predicted
                );
            }
            self.predicted = -1;
        }
        if longseg {
            self.out.push((adr >> 8) as u8);
            self.out.push(adr as u8);
        }
        if execlo >= 0 {
            self.out.push(execlo as u8);
        } else {
            self.addr = adr;
            self.segaddr = adr;
        }
    }

    /// Close the stream: flush pending literals in a terminating control
    /// token and append the entry point.  Returns the finished stream and
    /// the relocatable flag.
    pub fn finish(mut self, entry: u16) -> (Vec<u8>, bool) {
        debug_assert!(self.addr >= 0);
        self.control(i32::from(entry >> 8), i32::from(entry & 0xff));
        displaylevel!(3, "gt1z: -- EXEC {:#06x}\n", entry);
        displaylevel!(2, "gt1z: info: written {} bytes\n", self.out.len());
        (self.out, self.relocatable)
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Emitter::new()
    }
}
