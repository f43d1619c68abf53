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

//! Performance benchmarks for the Ente toolchain.
//!
//! Run with: cargo bench
//!
//! Results are saved to target/criterion/ with HTML reports.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ente::vm::VmOptions;

// ============================================================================
// Benchmark Inputs
// ============================================================================

/// Build a program with `functions` small functions, each called from main.
fn generate_source(functions: usize) -> String {
    let mut source = String::from("program bench;\nvar acc: int;\nvar ratio: float;\n\n");
    for i in 0..functions {
        source.push_str(&format!(
            "void step{i}(n: int, f: float) {{\n\
             \x20   var k: int;\n\
             \x20   k = n * {i} + 3 - (n - 1) * 2;\n\
             \x20   if (k > {i}) {{ acc = acc + k; }} else {{ acc = acc - 1; }}\n\
             \x20   ratio = f / (n + 1);\n\
             }}\n\n"
        ));
    }
    source.push_str("main {\n    acc = 0;\n");
    for i in 0..functions {
        source.push_str(&format!("    step{i}({i}, {i}.5);\n"));
    }
    source.push_str("    write(acc, ratio);\n}\nend\n");
    source
}

/// A loop-heavy program for the interpreter.
fn loop_source(iterations: u32) -> String {
    format!(
        "var i, sum: int;\n\
         void add(x: int) {{ sum = sum + x; }}\n\
         main {{\n\
         \x20   i = 0;\n\
         \x20   sum = 0;\n\
         \x20   while (i < {iterations}) {{\n\
         \x20       add(i * 2);\n\
         \x20       i = i + 1;\n\
         \x20   }}\n\
         \x20   write(sum);\n\
         }}\n\
         end\n"
    )
}

const SIZES: [(&str, usize); 3] = [("small", 5), ("medium", 50), ("large", 500)];

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for (name, functions) in SIZES {
        let source = generate_source(functions);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), &source, |b, src| {
            b.iter(|| ente::lexer::tokenize(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Translator Benchmarks
// ============================================================================

fn bench_translator(c: &mut Criterion) {
    let mut group = c.benchmark_group("translator");

    for (name, functions) in SIZES {
        let source = generate_source(functions);
        // Pre-tokenize so only translation is measured
        let tokens = ente::lexer::tokenize(&source).tokens;
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_with_input(BenchmarkId::new("translate", name), &tokens, |b, tokens| {
            b.iter(|| ente::translator::translate(black_box(tokens)))
        });
    }

    group.finish();
}

// ============================================================================
// IR Text Benchmarks
// ============================================================================

fn bench_ir_text(c: &mut Criterion) {
    let source = generate_source(500);
    let program = ente::compile(&source).expect("benchmark input should compile");
    let text = ente::bytecode::write_ir(&program);

    let mut group = c.benchmark_group("ir_text");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("write", |b| {
        b.iter(|| ente::bytecode::write_ir(black_box(&program)))
    });
    group.bench_function("read", |b| {
        b.iter(|| ente::bytecode::read_ir(black_box(&text)))
    });
    group.finish();
}

// ============================================================================
// Virtual Machine Benchmarks
// ============================================================================

fn bench_vm(c: &mut Criterion) {
    let mut group = c.benchmark_group("vm");

    for iterations in [100u32, 1_000, 10_000] {
        let program = ente::compile(&loop_source(iterations)).expect("benchmark input should compile");
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("execute_loop", iterations),
            &program,
            |b, program| b.iter(|| ente::execute(black_box(program), VmOptions::default())),
        );
    }

    group.finish();
}

// ============================================================================
// Full Pipeline Benchmarks
// ============================================================================

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    for (name, functions) in SIZES {
        let source = generate_source(functions);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("run", name), &source, |b, src| {
            b.iter(|| ente::run(black_box(src), VmOptions::default()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer,
    bench_translator,
    bench_ir_text,
    bench_vm,
    bench_full_pipeline
);
criterion_main!(benches);
