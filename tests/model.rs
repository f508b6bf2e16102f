//! Randomized checks against a brute-force model.
//!
//! A seeded RNG drives long event streams over a few symbols. After every
//! event the store is compared with a naive model that keeps the active
//! orders in plain maps and scans them for each query. At the end every
//! recorded timestamp is queried again to check the "as of" history.

use std::collections::{BTreeMap, HashMap};

use orderbook_history::types::{BuyEntry, OrderEvent, SellQuote, Side};
use orderbook_history::BookManager;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SYMBOLS: [&str; 3] = ["AAA", "BBB", "CCC"];

/// Naive per-symbol state
#[derive(Default, Clone)]
struct Model {
    sells: HashMap<u64, (f64, u64)>,
    buys: HashMap<u64, u64>,
}

impl Model {
    /// Best sell as (price, volume); full ties are not distinguished
    fn best_sell(&self) -> Option<(f64, u64)> {
        self.sells
            .values()
            .copied()
            .max_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
    }

    fn top_buys(&self, k: usize) -> Vec<BuyEntry> {
        let mut entries: Vec<_> = self
            .buys
            .iter()
            .map(|(&id, &volume)| BuyEntry::new(id, volume))
            .collect();
        entries.sort_by(|a, b| b.volume.cmp(&a.volume).then(a.order_id.cmp(&b.order_id)));
        entries.truncate(k);
        entries
    }

    fn active(&self) -> u64 {
        (self.sells.len() + self.buys.len()) as u64
    }
}

/// Generate an event that the model considers valid, and apply it to the model
fn next_event(
    rng: &mut StdRng,
    models: &mut HashMap<&'static str, Model>,
    ts: &str,
    next_id: &mut u64,
) -> OrderEvent {
    let symbol = SYMBOLS[rng.gen_range(0..SYMBOLS.len())];
    let model = models.entry(symbol).or_default();
    let side = if rng.gen_bool(0.5) { Side::Sell } else { Side::Buy };
    let price = f64::from(rng.gen_range(1..=20u32)) / 2.0;
    let volume = rng.gen_range(1..=5u64);

    let active: Vec<u64> = match side {
        Side::Sell => model.sells.keys().copied().collect(),
        Side::Buy => model.buys.keys().copied().collect(),
    };

    let roll = rng.gen_range(0..10);
    if active.is_empty() || roll < 4 {
        *next_id += 1;
        let id = *next_id;
        match side {
            Side::Sell => {
                model.sells.insert(id, (price, volume));
            }
            Side::Buy => {
                model.buys.insert(id, volume);
            }
        }
        return OrderEvent::insert(ts, symbol, id, side, volume, price);
    }

    let id = active[rng.gen_range(0..active.len())];
    if roll < 7 {
        match side {
            Side::Sell => {
                model.sells.insert(id, (price, volume));
            }
            Side::Buy => {
                model.buys.insert(id, volume);
            }
        }
        OrderEvent::amend(ts, symbol, id, side, volume, price)
    } else {
        match side {
            Side::Sell => {
                model.sells.remove(&id);
            }
            Side::Buy => {
                model.buys.remove(&id);
            }
        }
        OrderEvent::cancel(ts, symbol, id, side)
    }
}

fn check_best(manager: &BookManager, model: &Model, symbol: &str, ts: &str) {
    let got = manager.best_sell_as_of(symbol, ts);
    assert_eq!(
        got.map(|q| (q.price, q.volume)),
        model.best_sell(),
        "best sell mismatch for {symbol} at {ts}"
    );
    if let Some(SellQuote {
        order_id,
        price,
        volume,
    }) = got
    {
        assert_eq!(model.sells.get(&order_id), Some(&(price, volume)));
    }
}

fn run(seed: u64, events: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let manager = BookManager::new();
    let mut models: HashMap<&'static str, Model> = HashMap::new();
    let mut history: BTreeMap<(String, &'static str), Model> = BTreeMap::new();
    let mut next_id = 0;
    let mut clock = 0u32;

    for _ in 0..events {
        // about a third of events share the previous timestamp
        if rng.gen_range(0..3) != 0 {
            clock += 1;
        }
        let ts = format!("{clock:08}");
        let event = next_event(&mut rng, &mut models, &ts, &mut next_id);
        manager.apply(&event).unwrap();

        let symbol = SYMBOLS
            .iter()
            .copied()
            .find(|s| *s == event.symbol)
            .unwrap();
        let model = &models[symbol];
        check_best(&manager, model, symbol, &ts);
        assert_eq!(manager.top_buy_orders(symbol), model.top_buys(3));
        assert_eq!(manager.active_order_counts()[symbol], model.active());

        if event.side == Side::Sell {
            history.insert((ts, symbol), model.clone());
        }
    }

    // every recorded sell state is still reachable
    for ((ts, symbol), model) in &history {
        check_best(&manager, model, symbol, ts);
    }
}

#[test]
fn test_random_streams_match_model() {
    for seed in [1, 7, 42, 2024] {
        run(seed, 2_000);
    }
}

#[test]
fn test_long_single_stream_matches_model() {
    run(0xDEC0DE, 10_000);
}

#[test]
fn test_growth_preserves_previous_best() {
    let mut rng = StdRng::seed_from_u64(99);
    for round in 0..50u64 {
        let manager = BookManager::new();
        let count = rng.gen_range(1..=16u64);
        let mut best: Option<(f64, u64)> = None;

        for id in 0..count {
            let price = f64::from(rng.gen_range(1..=10u32));
            let volume = rng.gen_range(1..=5);
            manager
                .apply(&OrderEvent::insert(format!("{id:04}"), "AAA", id, Side::Sell, volume, price))
                .unwrap();
            let candidate = (price, volume);
            best = match best {
                Some(b) if b.0 > candidate.0 || (b.0 == candidate.0 && b.1 >= candidate.1) => Some(b),
                _ => Some(candidate),
            };

            let got = manager.best_sell_as_of("AAA", &format!("{id:04}")).unwrap();
            assert_eq!(Some((got.price, got.volume)), best, "round {round}, insert {id}");
        }
    }
}

#[test]
fn test_insert_then_cancel_restores_previous_best() {
    let mut rng = StdRng::seed_from_u64(5);
    let manager = BookManager::new();
    let mut clock = 0u32;

    for id in 0..200u64 {
        clock += 1;
        let price = f64::from(rng.gen_range(1..=50u32));
        manager
            .apply(&OrderEvent::insert(format!("{clock:06}"), "AAA", id, Side::Sell, 1, price))
            .unwrap();
        let before = manager.best_sell_as_of("AAA", &format!("{clock:06}"));

        clock += 1;
        manager
            .apply(&OrderEvent::insert(format!("{clock:06}"), "AAA", 10_000 + id, Side::Sell, 9, 1_000.0))
            .unwrap();
        clock += 1;
        manager
            .apply(&OrderEvent::cancel(format!("{clock:06}"), "AAA", 10_000 + id, Side::Sell))
            .unwrap();

        assert_eq!(manager.best_sell_as_of("AAA", &format!("{clock:06}")), before);
    }
}
