use super::{BenchProgram, BenchStep, Check};
use crate::fifo::{CircularBuffer, FifoInput, FifoOutput};
use crate::parse::SrcSpan;
use crate::word::{Word, WordWidth};

//===========================================================================//

/// One row of a bench trace: the inputs driven during a clock cycle, and the
/// registered outputs after its clock edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TraceRow {
    /// The zero-based index of the cycle.
    pub cycle: u64,
    /// The inputs driven during the cycle.
    pub input: FifoInput,
    /// The outputs after the clock edge.
    pub output: FifoOutput,
}

/// An `expect` check that did not hold.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BenchFailure {
    /// The location of the failed `expect` statement.
    pub span: SrcSpan,
    /// A description of the mismatch.
    pub message: String,
}

/// The results of running a bench program.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BenchReport {
    /// One row per simulated clock cycle, in order.
    pub trace: Vec<TraceRow>,
    /// Every failed check, in program order.
    pub failures: Vec<BenchFailure>,
}

impl BenchReport {
    /// Returns true if every check held.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

//===========================================================================//

/// Runs compiled bench programs against a simulated FIFO.
pub struct Testbench {
    fifo: CircularBuffer,
}

impl Testbench {
    /// Returns a testbench wrapped around the given buffer.
    pub fn new(fifo: CircularBuffer) -> Testbench {
        Testbench { fifo }
    }

    /// Returns the buffer under test.
    pub fn fifo(&self) -> &CircularBuffer {
        &self.fifo
    }

    /// Consumes the testbench, returning the buffer under test.
    pub fn into_fifo(self) -> CircularBuffer {
        self.fifo
    }

    /// Runs every step of the program.  A failed check is recorded in the
    /// report, and the run carries on.
    pub fn run(&mut self, program: &BenchProgram) -> BenchReport {
        log::info!(
            "running bench program of {} cycles against a {}-word {} FIFO",
            program.num_cycles(),
            self.fifo.capacity(),
            self.fifo.width()
        );
        let mut report = BenchReport::default();
        for step in program.steps() {
            match *step {
                BenchStep::Cycle(input) => {
                    let cycle = self.fifo.cycle();
                    let output = self.fifo.step(input);
                    report.trace.push(TraceRow { cycle, input, output });
                }
                BenchStep::Expect(span, check) => {
                    if let Some(message) = self.check(check) {
                        log::debug!("check failed: {message}");
                        report.failures.push(BenchFailure { span, message });
                    }
                }
            }
        }
        log::info!(
            "bench finished after {} cycles with {} failed checks",
            report.trace.len(),
            report.failures.len()
        );
        report
    }

    fn check(&self, check: Check) -> Option<String> {
        let output = self.fifo.output();
        let cycles = self.fifo.cycle();
        let (signal, expected, actual) = match check {
            Check::Data(data) => (
                "data",
                format!("{data:#x}"),
                format!("{:#x}", output.data_out),
            ),
            Check::Empty(empty) => {
                ("empty", empty.to_string(), output.empty.to_string())
            }
            Check::Full(full) => {
                ("full", full.to_string(), output.full.to_string())
            }
            Check::Occupancy(count) => (
                "occupancy",
                count.to_string(),
                output.occupancy.to_string(),
            ),
        };
        if expected == actual {
            None
        } else {
            Some(format!(
                "expected {signal} {expected}, but was {actual} \
                 (after {cycles} cycles)"
            ))
        }
    }
}

//===========================================================================//

/// Renders a bench trace as a fixed-width text table, with one header line
/// followed by one line per cycle.
pub fn render_trace(trace: &[TraceRow], width: WordWidth) -> String {
    let digits = width.hex_digits();
    let column = digits.max(4);
    let mut table = format!(
        "{:>5} {:>3} {:>2} {:>2} {:>column$} {:>column$} \
         {:>4} {:>5} {:>5}\n",
        "cycle", "rst", "wr", "rd", "din", "dout", "full", "empty", "count"
    );
    for row in trace {
        table.push_str(&format!(
            "{:>5} {:>3} {:>2} {:>2} {:>column$} {:>column$} \
             {:>4} {:>5} {:>5}\n",
            row.cycle,
            u8::from(row.input.reset),
            u8::from(row.input.write_request),
            u8::from(row.input.read_request),
            hex(row.input.data_in, digits),
            hex(row.output.data_out, digits),
            u8::from(row.output.full),
            u8::from(row.output.empty),
            row.output.occupancy
        ));
    }
    table
}

fn hex(value: Word, digits: usize) -> String {
    format!("{value:0digits$x}")
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{BenchFailure, BenchReport, Testbench, render_trace};
    use crate::bench::BenchProgram;
    use crate::fifo::CircularBuffer;
    use crate::parse::SrcSpan;
    use crate::store::MemConfig;
    use crate::word::WordWidth;

    fn run(capacity: usize, source: &str) -> BenchReport {
        let config = MemConfig::new(capacity, 8).unwrap();
        let program = BenchProgram::parse_source(source, config).unwrap();
        Testbench::new(CircularBuffer::new(config)).run(&program)
    }

    #[test]
    fn passing_script() {
        let report = run(
            4,
            "reset\nexpect empty\nwrite 1\nwrite 2\nexpect occupancy 2\n\
             read\nexpect data 1\nexpect full false\n",
        );
        assert!(report.passed());
        assert_eq!(report.trace.len(), 4);
        assert_eq!(report.trace[3].cycle, 3);
        assert_eq!(report.trace[3].output.data_out, 1);
    }

    #[test]
    fn failures_do_not_stop_the_run() {
        let report = run(2, "write 5\nexpect empty\nwrite 6\nexpect full\n");
        assert_eq!(report.trace.len(), 2);
        assert_eq!(
            report.failures,
            vec![BenchFailure {
                span: SrcSpan::from_byte_range(8..20),
                message: "expected empty true, but was false \
                          (after 1 cycles)"
                    .to_string(),
            }]
        );
    }

    #[test]
    fn data_mismatch_is_reported_in_hex() {
        let report = run(2, "write 0x2a\nread\nexpect data 0x2b\n");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].message,
            "expected data 0x2b, but was 0x2a (after 2 cycles)"
        );
    }

    #[test]
    fn trace_table() {
        let report = run(2, "reset\nwrite 0xa, read\n");
        assert_eq!(
            render_trace(&report.trace, WordWidth::new(8).unwrap()),
            "cycle rst wr rd  din dout full empty count\n\
             \x20   0   1  0  0   00   00    0     1     0\n\
             \x20   1   0  1  1   0a   00    0     0     1\n"
        );
    }

    #[test]
    fn empty_trace_is_just_the_header() {
        assert_eq!(
            render_trace(&[], WordWidth::new(4).unwrap()),
            "cycle rst wr rd  din dout full empty count\n"
        );
    }

    #[test]
    fn wide_trace_columns() {
        let config = MemConfig::new(2, 16).unwrap();
        let program =
            BenchProgram::parse_source("write 0x1234\n", config).unwrap();
        let report = Testbench::new(CircularBuffer::new(config)).run(&program);
        let table = render_trace(&report.trace, config.width());
        assert_eq!(
            table.lines().nth(1),
            Some("    0   0  1  0 1234 0000    0     0     1")
        );
    }
}

//===========================================================================//
