use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::NamedTempFile;

use parley::catalog::{ORDER_NOT_FOUND, PRODUCT_NOT_FOUND, USER_NOT_FOUND};
use parley::corpus::{CorpusSource, Dataset, FileSource, Record, StaticSource};
use parley::engine::SupportEngine;
use parley::error::{ParleyError, Result};
use parley::responder::{NO_MATCH_RESPONSE, Resolution};

const WIDGET_QUERY: &str = "tell me about the widget";

fn widget_dataset(output: &str) -> Dataset {
    Dataset::from(vec![Record::new(
        "Get product details",
        "Product Name: Widget",
        output,
    )])
}

fn support_dataset() -> Dataset {
    Dataset::from(vec![
        Record::new(
            "Get product details for this mobile phone",
            "Product Name: Nova Phone",
            "The Nova Phone has a 6.5 inch screen.",
        ),
        Record::new(
            "Show order details",
            "Order ID: 1001",
            "Order 1001 was delivered yesterday.",
        ),
        Record::new(
            "Show user profile",
            "User ID: U42",
            "U42 is a gold member.",
        ),
        Record::new(
            "Check user coin balance",
            "User ID: U1",
            "You have 120 coins.",
        ),
        Record::new(
            "Check user coin balance",
            "User ID: U2",
            "You have 45 coins.",
        ),
    ])
}

/// Serves `before` on the first load; later loads wait on the gate twice and
/// then serve `after`.
#[derive(Debug)]
struct GatedSource {
    loads: AtomicUsize,
    before: Dataset,
    after: Dataset,
    gate: Barrier,
}

impl GatedSource {
    fn new(before: Dataset, after: Dataset) -> Self {
        GatedSource {
            loads: AtomicUsize::new(0),
            before,
            after,
            gate: Barrier::new(2),
        }
    }
}

impl CorpusSource for GatedSource {
    fn load(&self) -> Result<Dataset> {
        if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(self.before.clone());
        }
        self.gate.wait();
        self.gate.wait();
        Ok(self.after.clone())
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

/// Succeeds while `available` is set.
#[derive(Debug)]
struct FlakySource {
    available: AtomicBool,
    dataset: Dataset,
}

impl CorpusSource for FlakySource {
    fn load(&self) -> Result<Dataset> {
        if self.available.load(Ordering::SeqCst) {
            Ok(self.dataset.clone())
        } else {
            Err(ParleyError::source_unavailable("remote fetch failed"))
        }
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

/// Alternates between two datasets on every load.
#[derive(Debug)]
struct ToggleSource {
    loads: AtomicUsize,
    datasets: [Dataset; 2],
}

impl CorpusSource for ToggleSource {
    fn load(&self) -> Result<Dataset> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.datasets[n % 2].clone())
    }

    fn describe(&self) -> String {
        "toggle".to_string()
    }
}

#[test]
fn single_record_corpus_answers_widget_query() -> Result<()> {
    let engine = SupportEngine::new(Arc::new(StaticSource::new(widget_dataset(
        "The Widget is great.",
    ))));

    // Query terms: tell, me, about, widget. Only "widget" is in the
    // vocabulary {details, get, product, widget}, whose row weights are
    // (1, 1, 2, 1) / sqrt(7), so the cosine is 1 / sqrt(7) ~= 0.378.
    let resolution = engine.resolve(WIDGET_QUERY, None);
    match resolution {
        Resolution::Matched { index, score } => {
            assert_eq!(index, 0);
            assert!((score - 1.0 / 7f64.sqrt()).abs() < 1e-9);
        }
        other => panic!("expected a confident match, got {other:?}"),
    }
    assert_eq!(engine.answer(WIDGET_QUERY, None), "The Widget is great.");
    Ok(())
}

#[test]
fn empty_corpus_always_apologizes() -> Result<()> {
    let engine = SupportEngine::new(Arc::new(StaticSource::new(Dataset::new())));

    for query in ["tell me about the widget", "", "where is my order 1001", "   "] {
        assert_eq!(engine.answer(query, None), NO_MATCH_RESPONSE);
        assert_eq!(engine.answer(query, Some("U1")), NO_MATCH_RESPONSE);
        assert!(matches!(
            engine.resolve(query, None),
            Resolution::NoConfidentMatch { .. }
        ));
    }
    assert_eq!(engine.stats().vocabulary_size, 0);
    Ok(())
}

#[test]
fn answers_are_deterministic() -> Result<()> {
    let engine = SupportEngine::new(Arc::new(StaticSource::new(support_dataset())));

    for query in [
        "nova phone screen details",
        "show my order details",
        "check my coin balance",
        "completely unrelated words",
    ] {
        assert_eq!(engine.answer(query, None), engine.answer(query, None));
        assert_eq!(engine.resolve(query, None), engine.resolve(query, None));
    }

    // A second engine over the same corpus agrees too.
    let other = SupportEngine::new(Arc::new(StaticSource::new(support_dataset())));
    assert_eq!(
        engine.answer("nova phone screen details", None),
        other.answer("nova phone screen details", None)
    );
    Ok(())
}

#[test]
fn user_id_substitutes_balance_record() -> Result<()> {
    let engine = SupportEngine::new(Arc::new(StaticSource::new(support_dataset())));

    assert_eq!(
        engine.answer("check user coin balance", None),
        "You have 120 coins."
    );
    assert_eq!(
        engine.answer("check user coin balance", Some("U7")),
        "You have 45 coins."
    );
    assert_eq!(
        engine.answer("check user coin balance", Some("")),
        "You have 120 coins."
    );
    Ok(())
}

#[test]
fn lookups_use_the_categorized_store() -> Result<()> {
    let engine = SupportEngine::new(Arc::new(StaticSource::new(support_dataset())));

    assert_eq!(
        engine.get_product_info("Nova Phone"),
        "The Nova Phone has a 6.5 inch screen."
    );
    assert_eq!(
        engine.get_product_info("nova"),
        "The Nova Phone has a 6.5 inch screen."
    );
    assert_eq!(engine.get_product_info("Pixel"), PRODUCT_NOT_FOUND);

    assert_eq!(engine.get_user_info("U42"), "U42 is a gold member.");
    assert_eq!(engine.get_user_info("U1"), USER_NOT_FOUND);

    assert_eq!(
        engine.get_order_info(Some("1001"), None),
        "Order 1001 was delivered yesterday."
    );
    assert_eq!(
        engine.get_order_info(None, Some("Nova Phone")),
        ORDER_NOT_FOUND
    );

    let stats = engine.stats();
    assert_eq!(stats.records, 5);
    assert_eq!((stats.products, stats.orders, stats.users), (1, 1, 1));
    Ok(())
}

#[test]
fn retrain_is_atomic_for_concurrent_queries() -> Result<()> {
    let source = Arc::new(GatedSource::new(
        widget_dataset("The Widget is great."),
        Dataset::from(vec![Record::new(
            "Get product details",
            "Product Name: Gadget",
            "The Gadget is better.",
        )]),
    ));
    let engine = Arc::new(SupportEngine::new(source.clone()));
    let held = engine.snapshot();

    let retrain = thread::spawn({
        let engine = Arc::clone(&engine);
        move || engine.train_model()
    });

    // The retrain is now blocked inside `load`.
    source.gate.wait();
    assert_eq!(engine.answer(WIDGET_QUERY, None), "The Widget is great.");
    assert_eq!(engine.answer("tell me about the gadget", None), NO_MATCH_RESPONSE);
    assert_eq!(engine.get_product_info("Widget"), "The Widget is great.");
    assert_eq!(engine.stats().generation, 0);
    source.gate.wait();

    retrain.join().expect("retrain thread panicked")?;

    assert_eq!(engine.stats().generation, 1);
    assert_eq!(
        engine.answer("tell me about the gadget", None),
        "The Gadget is better."
    );
    assert_eq!(engine.answer(WIDGET_QUERY, None), NO_MATCH_RESPONSE);
    assert_eq!(engine.get_product_info("Widget"), PRODUCT_NOT_FOUND);

    // A snapshot taken before the swap is still whole.
    assert_eq!(held.generation(), 0);
    assert_eq!(held.dataset()[0].output, "The Widget is great.");
    assert_eq!(held.vectorizer().space()?.len(), held.dataset().len());
    assert_eq!(held.store().product_info("Widget"), "The Widget is great.");
    Ok(())
}

#[test]
fn concurrent_readers_never_observe_mixed_state() -> Result<()> {
    let great = widget_dataset("The Widget is great.");
    let mut discontinued: Vec<Record> = widget_dataset("The Widget is discontinued.")
        .iter()
        .cloned()
        .collect();
    discontinued.push(Record::new(
        "Show order details",
        "Order ID: 77",
        "Order 77 is on its way.",
    ));

    let engine = Arc::new(SupportEngine::new(Arc::new(ToggleSource {
        loads: AtomicUsize::new(0),
        datasets: [great, Dataset::from(discontinued)],
    })));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..200 {
                    let answer = engine.answer(WIDGET_QUERY, None);
                    assert!(
                        answer == "The Widget is great." || answer == "The Widget is discontinued.",
                        "unexpected answer: {answer}"
                    );

                    let state = engine.snapshot();
                    let rows = state.vectorizer().space().map(|s| s.len()).unwrap_or(0);
                    assert_eq!(rows, state.dataset().len());
                }
            })
        })
        .collect();

    for _ in 0..50 {
        engine.train_model()?;
    }
    for reader in readers {
        reader.join().expect("reader thread panicked");
    }

    assert_eq!(engine.stats().generation, 50);
    Ok(())
}

#[test]
fn responses_render_against_the_resolving_snapshot() -> Result<()> {
    // Generation n serves datasets[n % 2]; the widget record moves between rows.
    let first = widget_dataset("First widget");
    let second = Dataset::from(vec![
        Record::new("Show order details", "Order ID: 5", "Order 5 is on its way."),
        Record::new("Get product details", "Product Name: Widget", "Second widget"),
    ]);

    let engine = Arc::new(SupportEngine::new(Arc::new(ToggleSource {
        loads: AtomicUsize::new(0),
        datasets: [first, second],
    })));

    let trainer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || -> Result<()> {
            for _ in 0..200 {
                engine.train_model()?;
            }
            Ok(())
        })
    };

    for _ in 0..2000 {
        let answer = engine.respond(WIDGET_QUERY, None);
        let (text, index) = if answer.generation % 2 == 0 {
            ("First widget", 0)
        } else {
            ("Second widget", 1)
        };
        assert_eq!(answer.text, text, "generation {}", answer.generation);
        assert_eq!(answer.resolution.index(), Some(index));
    }

    trainer.join().expect("trainer thread panicked")?;
    assert_eq!(engine.respond(WIDGET_QUERY, None).generation, 200);
    Ok(())
}

#[test]
fn failed_retrain_keeps_previous_state() -> Result<()> {
    let source = Arc::new(FlakySource {
        available: AtomicBool::new(true),
        dataset: widget_dataset("The Widget is great."),
    });
    let engine = SupportEngine::new(source.clone());
    let before = engine.stats();

    source.available.store(false, Ordering::SeqCst);
    let err = engine.train_model().unwrap_err();
    assert!(err.is_source_unavailable());

    assert_eq!(engine.stats(), before);
    assert_eq!(engine.answer(WIDGET_QUERY, None), "The Widget is great.");

    source.available.store(true, Ordering::SeqCst);
    engine.train_model()?;
    assert_eq!(engine.stats().generation, before.generation + 1);
    Ok(())
}

#[test]
fn local_file_corpus_is_strict_and_reloadable() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(
        file,
        r#"{{"instruction": "Get product details", "input": "Product Name: Widget", "output": "The Widget is great."}}"#
    )?;
    writeln!(file)?;
    writeln!(file, r#"{{"instruction": "Show order details", "input": "Order ID: 5"}}"#)?;
    file.flush()?;

    // The malformed line makes construction fall back to an empty corpus.
    let engine = SupportEngine::new(Arc::new(FileSource::new(file.path())));
    assert_eq!(engine.stats().records, 0);
    assert_eq!(engine.answer(WIDGET_QUERY, None), NO_MATCH_RESPONSE);

    // Retraining reports the bad line and keeps the empty state.
    match engine.train_model() {
        Err(ParleyError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a malformed record error, got {other:?}"),
    }
    assert_eq!(engine.stats().generation, 0);

    // Once the file is fixed a retrain picks it up.
    std::fs::write(
        file.path(),
        concat!(
            r#"{"instruction": "Get product details", "input": "Product Name: Widget", "output": "The Widget is great."}"#,
            "\n"
        ),
    )?;

    engine.train_model()?;
    assert_eq!(engine.stats().records, 1);
    assert_eq!(engine.answer(WIDGET_QUERY, None), "The Widget is great.");
    Ok(())
}

#[test]
fn missing_file_yields_empty_engine() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let engine = SupportEngine::new(Arc::new(FileSource::new(dir.path().join("absent.jsonl"))));

    assert_eq!(engine.stats().records, 0);
    assert_eq!(engine.answer("anything", None), NO_MATCH_RESPONSE);
    assert!(engine.train_model().unwrap_err().is_source_unavailable());
    Ok(())
}
