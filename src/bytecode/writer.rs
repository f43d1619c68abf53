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

//! IR text writer.

use super::{CONSTANTS, DESCRIPTOR, END_DESCRIPTOR, END_FUNCTION, FUNCTION, QUADRUPLES};
use crate::ir::{CompiledProgram, Quadruple, Target};
use crate::memory::{Address, ConstantValue, Segment, SegmentSizes};

/// Serialize a compiled program into its text form.
pub fn write_ir(program: &CompiledProgram) -> String {
    let mut out = String::new();

    out.push_str(DESCRIPTOR);
    out.push('\n');
    for segment in SegmentSizes::segments() {
        let size = program.descriptor.globals.get(segment);
        out.push_str(&format!("{} {}\n", segment.name(), size));
    }
    for frame in &program.descriptor.functions {
        out.push_str(&format!("{} {} {}\n", FUNCTION, frame.name, frame.entry));
        out.push_str(&format!("{} {}\n", Segment::LocalInt.name(), frame.locals.int));
        out.push_str(&format!("{} {}\n", Segment::LocalFloat.name(), frame.locals.float));
        out.push_str(END_FUNCTION);
        out.push('\n');
    }
    out.push_str(END_DESCRIPTOR);
    out.push('\n');

    out.push_str(CONSTANTS);
    out.push('\n');
    for constant in program.constants.iter() {
        out.push_str(&format!(
            "{} {}\n",
            constant.address,
            encode_literal(&constant.value)
        ));
    }

    out.push_str(QUADRUPLES);
    out.push('\n');
    for quadruple in program.quadruples.iter() {
        out.push_str(&encode_quadruple(quadruple));
        out.push('\n');
    }

    out
}

fn encode_literal(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Int(value) => value.to_string(),
        // Debug formatting is the shortest representation that parses back exactly.
        ConstantValue::Float(value) => format!("{:?}", value),
        ConstantValue::Str(text) => {
            let mut escaped = String::with_capacity(text.len());
            for c in text.chars() {
                match c {
                    '\\' => escaped.push_str("\\\\"),
                    '\n' => escaped.push_str("\\n"),
                    '\r' => escaped.push_str("\\r"),
                    other => escaped.push(other),
                }
            }
            escaped
        }
    }
}

fn encode_quadruple(quadruple: &Quadruple) -> String {
    let operand = |address: Option<Address>| address.map_or(-1, |a| i64::from(a.value()));
    let result = match quadruple.result {
        Target::Unset => -1,
        Target::Address(address) => i64::from(address.value()),
        Target::Jump(index) => index.value() as i64,
    };
    format!(
        "{} {} {} {}",
        quadruple.operator.code(),
        operand(quadruple.arg1),
        operand(quadruple.arg2),
        result
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_encoding() {
        assert_eq!(encode_literal(&ConstantValue::Int(-3)), "-3");
        assert_eq!(encode_literal(&ConstantValue::Float(2.0)), "2.0");
        assert_eq!(encode_literal(&ConstantValue::Float(0.1)), "0.1");
        assert_eq!(
            encode_literal(&ConstantValue::Str("a\\b\nc d".into())),
            "a\\\\b\\nc d"
        );
    }

    #[test]
    fn test_empty_program_layout() {
        let text = write_ir(&CompiledProgram::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"%descriptor"));
        assert_eq!(lines[1], "global-void 0");
        assert_eq!(lines[9], "const-string 0");
        assert_eq!(&lines[10..], &["%enddescriptor", "%constants", "%quadruples"]);
    }
}
