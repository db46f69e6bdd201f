//! Facilities for driving a simulated FIFO from a bench script.
//!
//! A bench script is first parsed into a [`BenchScriptAst`], then compiled
//! against a particular buffer configuration into a flat [`BenchProgram`] of
//! clock cycles and output checks, which a [`Testbench`] then runs.

use crate::fifo::FifoInput;
use crate::parse::{
    ActionAst, ActionAstNode, BenchScriptAst, BenchStmtAst, CheckAst,
    ExpectAst, IntAst, ParseError, ParseResult, SrcSpan,
};
use crate::store::MemConfig;
use crate::word::Word;

mod run;

pub use run::{BenchFailure, BenchReport, Testbench, TraceRow, render_trace};

//===========================================================================//

/// One step of a compiled bench program.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BenchStep {
    /// Simulate one clock cycle with the given inputs.
    Cycle(FifoInput),
    /// Check the current outputs.
    Expect(SrcSpan, Check),
}

/// An expected value for one of the buffer's output signals.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Check {
    /// The `data_out` signal should have the given value.
    Data(Word),
    /// The `empty` flag should have the given value.
    Empty(bool),
    /// The `full` flag should have the given value.
    Full(bool),
    /// The occupancy count should have the given value.
    Occupancy(usize),
}

//===========================================================================//

/// A bench script, compiled into a flat sequence of steps.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BenchProgram {
    steps: Vec<BenchStep>,
}

impl BenchProgram {
    /// The maximum number of steps a script may expand to once all `repeat`
    /// blocks have been unrolled.
    pub const MAX_STEPS: usize = 1 << 24;

    /// Parses and compiles a bench script for a buffer with the given
    /// configuration.
    pub fn parse_source(
        source: &str,
        config: MemConfig,
    ) -> ParseResult<BenchProgram> {
        let ast = BenchScriptAst::parse_source(source)?;
        BenchProgram::compile(&ast, config)
    }

    /// Compiles a parsed bench script for a buffer with the given
    /// configuration.
    pub fn compile(
        ast: &BenchScriptAst,
        config: MemConfig,
    ) -> ParseResult<BenchProgram> {
        let mut compiler = Compiler {
            config,
            max_steps: BenchProgram::MAX_STEPS,
            errors: Vec::new(),
        };
        let steps = compiler.compile_block(&ast.statements);
        if compiler.errors.is_empty() {
            Ok(BenchProgram { steps })
        } else {
            Err(compiler.errors)
        }
    }

    /// Returns the steps of this program, in order.
    pub fn steps(&self) -> &[BenchStep] {
        &self.steps
    }

    /// Returns the number of clock cycles this program simulates.
    pub fn num_cycles(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, BenchStep::Cycle(_)))
            .count()
    }
}

//===========================================================================//

struct Compiler {
    config: MemConfig,
    max_steps: usize,
    errors: Vec<ParseError>,
}

impl Compiler {
    fn compile_block(
        &mut self,
        statements: &[BenchStmtAst],
    ) -> Vec<BenchStep> {
        let mut steps = Vec::<BenchStep>::new();
        for statement in statements {
            match statement {
                BenchStmtAst::Cycle(actions) => {
                    if let Some(input) = self.compile_cycle(actions) {
                        steps.push(BenchStep::Cycle(input));
                    }
                }
                BenchStmtAst::Expect(expect) => {
                    if let Some(check) = self.compile_expect(expect) {
                        steps.push(BenchStep::Expect(expect.span, check));
                    }
                }
                BenchStmtAst::Idle(_, count) => {
                    let count = match count {
                        Some(count) => match self.compile_count(count) {
                            Some(count) => count,
                            None => continue,
                        },
                        None => 1,
                    };
                    let idle = BenchStep::Cycle(FifoInput::idle());
                    steps.extend(std::iter::repeat_n(idle, count));
                }
                BenchStmtAst::Repeat(count, body) => {
                    let body = self.compile_block(body);
                    let Some(times) = self.compile_count(count) else {
                        continue;
                    };
                    let total = body.len().saturating_mul(times);
                    if total > self.max_steps {
                        let message = format!(
                            "repeat block expands to more than {} steps",
                            self.max_steps
                        );
                        self.errors.push(ParseError::new(count.span, message));
                        continue;
                    }
                    for _ in 0..times {
                        steps.extend_from_slice(&body);
                    }
                }
            }
            if steps.len() > self.max_steps {
                let message = format!(
                    "script expands to more than {} steps",
                    self.max_steps
                );
                let span = statement_span(statement);
                self.errors.push(ParseError::new(span, message));
                break;
            }
        }
        steps
    }

    fn compile_count(&mut self, count: &IntAst) -> Option<usize> {
        if count.value > self.max_steps as u64 {
            let message = format!(
                "count of {} exceeds the limit of {} steps",
                count.value, self.max_steps
            );
            self.errors.push(ParseError::new(count.span, message));
            None
        } else {
            Some(count.value as usize)
        }
    }

    fn compile_cycle(&mut self, actions: &[ActionAst]) -> Option<FifoInput> {
        let mut input = FifoInput::idle();
        let mut reset_span: Option<SrcSpan> = None;
        let mut write_span: Option<SrcSpan> = None;
        let mut read_span: Option<SrcSpan> = None;
        let mut ok = true;
        for action in actions {
            let (name, previous) = match action.node {
                ActionAstNode::Reset => ("reset", &mut reset_span),
                ActionAstNode::Read => ("read", &mut read_span),
                ActionAstNode::Write(_) => ("write", &mut write_span),
            };
            if let Some(previous) = *previous {
                let message =
                    format!("{name} requested more than once in one cycle");
                let label = "first requested here".to_string();
                self.errors.push(
                    ParseError::new(action.span, message)
                        .with_label(previous, label),
                );
                ok = false;
                continue;
            }
            *previous = Some(action.span);
            match action.node {
                ActionAstNode::Reset => input.reset = true,
                ActionAstNode::Read => input.read_request = true,
                ActionAstNode::Write(data) => {
                    ok &= self.check_word(&data, "write data");
                    input.write_request = true;
                    input.data_in = data.value;
                }
            }
        }
        if ok { Some(input) } else { None }
    }

    fn compile_expect(&mut self, expect: &ExpectAst) -> Option<Check> {
        match expect.check {
            CheckAst::Data(data) => {
                if self.check_word(&data, "expected data") {
                    Some(Check::Data(data.value))
                } else {
                    None
                }
            }
            CheckAst::Empty(value) => Some(Check::Empty(value)),
            CheckAst::Full(value) => Some(Check::Full(value)),
            CheckAst::Occupancy(count) => {
                let capacity = self.config.capacity();
                if count.value > capacity as u64 {
                    let message = format!(
                        "occupancy {} can never exceed the capacity of {}",
                        count.value, capacity
                    );
                    self.errors.push(ParseError::new(count.span, message));
                    None
                } else {
                    Some(Check::Occupancy(count.value as usize))
                }
            }
        }
    }

    fn check_word(&mut self, int: &IntAst, what: &str) -> bool {
        let width = self.config.width();
        if width.fits(int.value) {
            true
        } else {
            let message = format!(
                "{what} {:#x} does not fit in a {width} word",
                int.value
            );
            self.errors.push(ParseError::new(int.span, message));
            false
        }
    }
}

fn statement_span(statement: &BenchStmtAst) -> SrcSpan {
    match statement {
        BenchStmtAst::Repeat(count, _) => count.span,
        BenchStmtAst::Idle(span, count) => {
            count.map_or(*span, |count| span.merged_with(count.span))
        }
        BenchStmtAst::Cycle(actions) => actions
            .first()
            .map_or(SrcSpan::from_byte_range(0..0), |action| action.span),
        BenchStmtAst::Expect(expect) => expect.span,
    }
}

//===========================================================================//


//===========================================================================//
