use memprim::bench::{BenchProgram, Testbench, render_trace};
use memprim::fifo::CircularBuffer;
use memprim::store::MemConfig;

//===========================================================================//

const WRAP_AROUND_SCRIPT: &str = "\
; Fill a 16-word buffer, drain it, then write once more so that the
; write pointer wraps back around to slot 1.
reset
expect empty
repeat 16 {
    write 0x5a
}
expect full
expect occupancy 16
write 0xff            ; dropped: buffer is full
expect occupancy 16
repeat 16 {
    read
}
expect data 0x5a
expect empty true
write 0b1010_0101
expect occupancy 1
expect full false
";

fn run_script(capacity: usize, bits: u32, source: &str) -> Testbench {
    let config = MemConfig::new(capacity, bits).unwrap();
    let program = BenchProgram::parse_source(source, config).unwrap();
    let mut bench = Testbench::new(CircularBuffer::new(config));
    let report = bench.run(&program);
    assert!(report.passed(), "failures: {:?}", report.failures);
    bench
}

//===========================================================================//

#[test]
fn wrap_around_script() {
    let bench = run_script(16, 8, WRAP_AROUND_SCRIPT);
    let fifo = bench.fifo();
    assert_eq!(fifo.cycle(), 35);
    assert_eq!(fifo.write_index(), 1);
    assert_eq!(fifo.read_index(), 0);
    assert_eq!(fifo.slot(0), Some(0xa5));
}

#[test]
fn ordering_script() {
    let source = "\
reset
write 1
write 2
write 3, read
expect data 1
expect occupancy 2
read
expect data 2
read
expect data 3
read
expect data 3   ; stale: read while empty
expect empty
";
    let fifo = run_script(4, 8, source).into_fifo();
    assert_eq!(fifo.contents().count(), 0);
}

#[test]
fn failed_expectations_are_located() {
    let source = "write 1\nexpect occupancy 2\nexpect full\n";
    let config = MemConfig::new(4, 8).unwrap();
    let program = BenchProgram::parse_source(source, config).unwrap();
    let report = Testbench::new(CircularBuffer::new(config)).run(&program);
    let locations: Vec<(usize, usize)> = report
        .failures
        .iter()
        .map(|failure| failure.span.line_column(source))
        .collect();
    assert_eq!(locations, vec![(2, 0), (3, 0)]);
    assert_eq!(
        report.failures[1].message,
        "expected full true, but was false (after 1 cycles)"
    );
}

#[test]
fn compile_errors_are_located() {
    let source = "reset\nwrite 0x1_0000\nread, read\n";
    let config = MemConfig::new(4, 16).unwrap();
    let errors = BenchProgram::parse_source(source, config).unwrap_err();
    let locations: Vec<(usize, usize)> = errors
        .iter()
        .map(|error| error.span.line_column(source))
        .collect();
    assert_eq!(locations, vec![(2, 6), (3, 6)]);
}

#[test]
fn missing_operand_is_located() {
    let source = "reset\nwrite\nexpect data\n";
    let config = MemConfig::new(4, 8).unwrap();
    let errors = BenchProgram::parse_source(source, config).unwrap_err();
    let locations: Vec<(usize, usize)> = errors
        .iter()
        .map(|error| error.span.line_column(source))
        .collect();
    assert_eq!(locations, vec![(2, 5), (3, 11)]);
    assert_eq!(errors[0].message, "expected integer, found linebreak");
}

#[test]
fn trace_has_one_row_per_cycle() {
    let config = MemConfig::new(4, 32).unwrap();
    let program = BenchProgram::parse_source("idle 3\n", config).unwrap();
    let report = Testbench::new(CircularBuffer::new(config)).run(&program);
    let table = render_trace(&report.trace, config.width());
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "cycle rst wr rd      din     dout full empty count"
    );
    assert_eq!(
        lines[3],
        "    2   0  0  0 00000000 00000000    0     1     0"
    );
}

//===========================================================================//
