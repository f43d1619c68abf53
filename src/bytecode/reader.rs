// Ente - A single-pass compiler and quadruple VM for the Ente teaching language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! IR text loader.
//!
//! The loader validates as it reads: every address must decode to a
//! segment of the right kind and every opcode must be known. A file that
//! loads is safe to hand to the virtual machine.

use std::iter::Peekable;

use super::{
    BytecodeError, CONSTANTS, DESCRIPTOR, END_DESCRIPTOR, END_FUNCTION, FUNCTION, QUADRUPLES,
};
use crate::ir::{
    CompiledProgram, Operator, Quadruple, QuadrupleIndex, QuadrupleStore, ResultKind, Target,
};
use crate::memory::{
    Address, ConstantTable, ConstantValue, FunctionFrame, LocalSizes, MemoryDescriptor, Segment,
    StorageClass,
};

type Lines<'a> = Peekable<Box<dyn Iterator<Item = (usize, &'a str)> + 'a>>;

/// Parse the text form of a compiled program.
pub fn read_ir(text: &str) -> Result<CompiledProgram, BytecodeError> {
    let iter: Box<dyn Iterator<Item = (usize, &str)> + '_> = Box::new(
        text.lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty()),
    );
    let mut lines: Lines<'_> = iter.peekable();

    expect_section(&mut lines, DESCRIPTOR)?;
    let descriptor = read_descriptor(&mut lines)?;
    expect_section(&mut lines, CONSTANTS)?;
    let constants = read_constants(&mut lines)?;
    expect_section(&mut lines, QUADRUPLES)?;
    let quadruples = read_quadruples(&mut lines)?;

    log::debug!(
        "loaded {} quadruples, {} constants, {} functions",
        quadruples.len(),
        constants.len(),
        descriptor.functions.len()
    );

    Ok(CompiledProgram {
        descriptor,
        constants,
        quadruples,
    })
}

fn malformed(line: usize, reason: impl Into<String>) -> BytecodeError {
    BytecodeError::MalformedLine {
        line,
        reason: reason.into(),
    }
}

fn is_section(line: &str) -> bool {
    line.starts_with('%')
}

fn expect_section(lines: &mut Lines<'_>, section: &'static str) -> Result<(), BytecodeError> {
    match lines.next() {
        Some((_, line)) if line.trim_end() == section => Ok(()),
        Some((number, line)) => Err(malformed(
            number,
            format!("expected '{}', found '{}'", section, line),
        )),
        None => Err(BytecodeError::MissingSection(section)),
    }
}

fn parse_number<T: std::str::FromStr>(
    line: usize,
    field: &str,
    what: &str,
) -> Result<T, BytecodeError> {
    field
        .parse()
        .map_err(|_| malformed(line, format!("invalid {} '{}'", what, field)))
}

fn read_size(line: usize, text: &str) -> Result<(Segment, u32), BytecodeError> {
    let (name, size) = text
        .split_once(' ')
        .ok_or_else(|| malformed(line, "expected '<segment> <size>'"))?;
    let segment = Segment::from_name(name)
        .ok_or_else(|| malformed(line, format!("unknown segment '{}'", name)))?;
    let size: u32 = parse_number(line, size.trim(), "size")?;
    if size > segment.capacity() {
        return Err(malformed(
            line,
            format!("{} size {} exceeds capacity {}", segment, size, segment.capacity()),
        ));
    }
    Ok((segment, size))
}

fn read_descriptor(lines: &mut Lines<'_>) -> Result<MemoryDescriptor, BytecodeError> {
    let mut descriptor = MemoryDescriptor::default();

    while let Some(&(number, line)) = lines.peek() {
        if is_section(line) {
            break;
        }
        lines.next();
        let (segment, size) = read_size(number, line)?;
        if segment.storage_class() == StorageClass::Local {
            return Err(malformed(number, format!("{} outside a function block", segment)));
        }
        descriptor.globals.set(segment, size);
    }

    loop {
        match lines.next() {
            Some((_, line)) if line.trim_end() == END_DESCRIPTOR => break,
            Some((number, line)) if line.starts_with(FUNCTION) => {
                let frame = read_function(lines, number, line)?;
                descriptor.functions.push(frame);
            }
            Some((number, line)) => {
                return Err(malformed(number, format!("unexpected '{}' in descriptor", line)))
            }
            None => return Err(BytecodeError::MissingSection(END_DESCRIPTOR)),
        }
    }

    Ok(descriptor)
}

fn read_function(
    lines: &mut Lines<'_>,
    number: usize,
    header: &str,
) -> Result<FunctionFrame, BytecodeError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [_, name, entry] = fields.as_slice() else {
        return Err(malformed(number, "expected '%function <name> <entry>'"));
    };
    let entry: usize = parse_number(number, entry, "entry")?;

    let mut locals = LocalSizes::default();
    loop {
        match lines.next() {
            Some((_, line)) if line.trim_end() == END_FUNCTION => break,
            Some((line_number, line)) => {
                let (segment, size) = read_size(line_number, line)?;
                if segment.storage_class() != StorageClass::Local {
                    return Err(malformed(
                        line_number,
                        format!("{} inside function block", segment),
                    ));
                }
                *locals.get_mut(segment) = size;
            }
            None => return Err(BytecodeError::MissingSection(END_FUNCTION)),
        }
    }

    Ok(FunctionFrame {
        name: name.to_string(),
        entry: QuadrupleIndex::new(entry),
        locals,
    })
}

fn read_constants(lines: &mut Lines<'_>) -> Result<ConstantTable, BytecodeError> {
    let mut table = ConstantTable::new();

    while let Some(&(number, line)) = lines.peek() {
        if is_section(line) {
            break;
        }
        lines.next();

        let (address, literal) = line.split_once(' ').unwrap_or((line, ""));
        let raw: u32 = parse_number(number, address, "address")?;
        let address = Address::new(raw);
        let value = match address.segment() {
            Some(Segment::ConstInt) => literal
                .parse()
                .map(ConstantValue::Int)
                .map_err(|_| invalid_constant(number, literal)),
            Some(Segment::ConstFloat) => literal
                .parse()
                .map(ConstantValue::Float)
                .map_err(|_| invalid_constant(number, literal)),
            Some(Segment::ConstString) => unescape(number, literal).map(ConstantValue::Str),
            _ => Err(malformed(number, format!("{} is not a constant address", address))),
        }?;

        if table.get(address).is_some() {
            return Err(malformed(number, format!("duplicate constant {}", address)));
        }
        table.insert(address, value);
    }

    Ok(table)
}

fn invalid_constant(line: usize, literal: &str) -> BytecodeError {
    BytecodeError::InvalidConstant {
        line,
        reason: format!("cannot parse '{}'", literal),
    }
}

fn unescape(line: usize, literal: &str) -> Result<String, BytecodeError> {
    let mut text = String::with_capacity(literal.len());
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => text.push('\\'),
            Some('n') => text.push('\n'),
            Some('r') => text.push('\r'),
            other => {
                let escape = other.map(String::from).unwrap_or_default();
                return Err(BytecodeError::InvalidConstant {
                    line,
                    reason: format!("bad escape sequence '\\{}'", escape),
                });
            }
        }
    }
    Ok(text)
}

fn read_quadruples(lines: &mut Lines<'_>) -> Result<QuadrupleStore, BytecodeError> {
    let mut quadruples = Vec::new();

    for (number, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [code, arg1, arg2, result] = fields.as_slice() else {
            return Err(malformed(number, "expected '<opcode> <arg1> <arg2> <result>'"));
        };

        let code: i64 = parse_number(number, code, "opcode")?;
        let operator = Operator::from_code(code).ok_or(BytecodeError::UnknownOpcode {
            line: number,
            code,
        })?;

        let arg1 = read_operand(number, arg1)?;
        let arg2 = read_operand(number, arg2)?;
        let result: i64 = parse_number(number, result, "result")?;

        let result = match (operator.result_kind(), result) {
            (ResultKind::None, -1) => Target::Unset,
            (ResultKind::None, _) => {
                return Err(malformed(number, format!("{} takes no result", operator)))
            }
            (ResultKind::Address, raw) => Target::Address(decode_address(number, raw)?),
            (ResultKind::Index, raw) if raw >= 0 => Target::Jump(QuadrupleIndex::new(raw as usize)),
            (ResultKind::Index, _) => {
                return Err(malformed(number, format!("{} has no target", operator)))
            }
        };

        quadruples.push(Quadruple::new(operator, arg1, arg2, result));
    }

    Ok(QuadrupleStore::from(quadruples))
}

fn read_operand(line: usize, field: &str) -> Result<Option<Address>, BytecodeError> {
    match parse_number::<i64>(line, field, "operand")? {
        -1 => Ok(None),
        raw => decode_address(line, raw).map(Some),
    }
}

fn decode_address(line: usize, raw: i64) -> Result<Address, BytecodeError> {
    u32::try_from(raw)
        .ok()
        .map(Address::new)
        .filter(|address| address.segment().is_some())
        .ok_or_else(|| malformed(line, format!("address {} is outside every segment", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "%descriptor
global-void 1
global-int 1
%function f 1
local-int 2
local-float 0
%endfunction
%enddescriptor
%constants
60000 5
70000 2.5
80000 a\\nb
%quadruples
1 -1 -1 2
9 -1 -1 -1
2 60000 -1 10000
3 80000 -1 -1
";

    #[test]
    fn test_read_minimal() {
        let program = read_ir(MINIMAL).unwrap();
        assert_eq!(program.descriptor.globals.get(Segment::GlobalInt), 1);
        assert_eq!(program.descriptor.functions.len(), 1);
        assert_eq!(program.descriptor.functions[0].locals.int, 2);
        assert_eq!(
            program.constants.get(Address::new(80_000)),
            Some(&ConstantValue::Str("a\nb".into()))
        );
        assert_eq!(program.quadruples.len(), 4);
        assert_eq!(
            program.quadruples.get(QuadrupleIndex::new(0)).map(|q| q.result),
            Some(Target::Jump(QuadrupleIndex::new(2)))
        );
    }

    #[test]
    fn test_missing_quadruples_section() {
        let text = "%descriptor\n%enddescriptor\n%constants\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::MissingSection("%quadruples"))
        ));
    }

    #[test]
    fn test_unknown_opcode() {
        let text = "%descriptor\n%enddescriptor\n%constants\n%quadruples\n7 -1 -1 -1\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::UnknownOpcode { line: 5, code: 7 })
        ));
    }

    #[test]
    fn test_operand_outside_segments() {
        let text = "%descriptor\n%enddescriptor\n%constants\n%quadruples\n3 5 -1 -1\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::MalformedLine { line: 5, .. })
        ));
    }

    #[test]
    fn test_constant_outside_constant_segment() {
        let text = "%descriptor\n%enddescriptor\n%constants\n10000 4\n%quadruples\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::MalformedLine { line: 4, .. })
        ));
    }

    #[test]
    fn test_bad_constant_literal() {
        let text = "%descriptor\n%enddescriptor\n%constants\n60000 x\n%quadruples\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::InvalidConstant { line: 4, .. })
        ));
    }

    #[test]
    fn test_unresolved_jump_rejected() {
        let text = "%descriptor\n%enddescriptor\n%constants\n%quadruples\n1 -1 -1 -1\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::MalformedLine { line: 5, .. })
        ));
    }

    #[test]
    fn test_local_segment_in_globals_rejected() {
        let text = "%descriptor\nlocal-int 3\n%enddescriptor\n%constants\n%quadruples\n";
        assert!(matches!(
            read_ir(text),
            Err(BytecodeError::MalformedLine { line: 2, .. })
        ));
    }
}
