use criterion::{criterion_group, criterion_main, Criterion};
use fim::config::Config;
use fim::context::{ContextRegistry, ContextStack, NormalMode};
use fim::document::Document;
use fim::key::{KeyCode, KeyEvent};
use fim::layout::{Dvorak, Layout, LayoutType};
use fim::state::EditorState;
use std::hint::black_box;

fn editor_state(text: &str) -> EditorState {
    let registry = ContextRegistry::default();
    let config = Config::builtin_with(&registry).expect("built-in config");
    EditorState::new(config, registry, Document::from_text(text))
}

fn binding_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding_lookup");
    let config = Config::builtin().expect("built-in config");

    group.bench_function("hit", |b| {
        b.iter(|| black_box(config.query("normal", KeyEvent::char('i'))))
    });

    group.bench_function("miss", |b| {
        b.iter(|| black_box(config.query("insert", KeyEvent::plain(KeyCode::F(12)))))
    });

    group.bench_function("parse_bind_line", |b| {
        let registry = ContextRegistry::default();
        b.iter(|| {
            black_box(Config::parse_with(
                black_box("bind normal <C-x> exec write"),
                &registry,
            ))
        })
    });

    group.finish();
}

fn layout_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_translation");
    let dvorak = Dvorak::new();
    let keys: Vec<KeyEvent> = "The quick brown fox jumps over the lazy dog"
        .chars()
        .map(KeyEvent::char)
        .collect();

    group.bench_function("dvorak_to_canonical", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(dvorak.to_canonical(*key));
            }
        })
    });

    group.bench_function("dvorak_round_trip", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(dvorak.from_canonical(dvorak.to_canonical(*key)));
            }
        })
    });

    group.finish();
}

fn dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("normal_motion", |b| {
        b.iter_batched(
            || {
                (
                    ContextStack::new(Box::new(NormalMode::new())),
                    editor_state("one\ntwo\nthree\n"),
                )
            },
            |(mut stack, mut ed)| {
                for key in ['j', 'j', 'k', 'l', 'h'] {
                    let _ = black_box(stack.dispatch(&mut ed, KeyEvent::char(key)));
                }
                (stack, ed)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("insert_and_escape", |b| {
        b.iter_batched(
            || {
                let mut ed = editor_state("");
                ed.config.options_mut().layout = LayoutType::Dvorak;
                let _ = ed.sync_options();
                (ContextStack::new(Box::new(NormalMode::new())), ed)
            },
            |(mut stack, mut ed)| {
                let mut keys: Vec<KeyEvent> = "chello".chars().map(KeyEvent::char).collect();
                keys.push(KeyEvent::plain(KeyCode::Esc));
                for key in keys {
                    let key = ed.to_canonical(key);
                    let _ = black_box(stack.dispatch(&mut ed, key));
                }
                (stack, ed)
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, binding_lookup, layout_translation, dispatch);
criterion_main!(benches);
