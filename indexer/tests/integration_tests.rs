//! End-to-end tests for the unconfirmed index and the combined history merge.

use corvid_indexer::{
    fetch_combined_history, HistoryError, IndexError, StandardScripts, TransactionIndexer,
};
use corvid_nullables::NullHistoryStore;
use corvid_store::{HistoryRow, StoreError};
use corvid_types::{
    PaymentAddress, Script, Transaction, TxHash, TxInput, TxOutput, TxPoint, MAX_HEIGHT,
    UNCONFIRMED_HEIGHT,
};

fn address(byte: u8) -> PaymentAddress {
    PaymentAddress::new([byte; 20])
}

fn point(byte: u8, index: u32) -> TxPoint {
    TxPoint::new(TxHash::new([byte; 32]), index)
}

/// One input spending `prev` and one output of `value`, both for `addr`.
fn transaction(addr: PaymentAddress, prev: TxPoint, value: u64) -> Transaction {
    Transaction {
        inputs: vec![TxInput {
            previous_output: prev,
            script: StandardScripts::pay_to_address(&addr),
        }],
        outputs: vec![TxOutput {
            value,
            script: StandardScripts::pay_to_address(&addr),
        }],
    }
}

#[tokio::test]
async fn index_then_query_returns_spend_and_output() {
    // Scenario: one input spending (H1, 0) from address Z, one output of
    // 5000 units back to Z.
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    let tx = transaction(z, point(0x11, 0), 5000);
    indexer.index(&tx).await.unwrap();

    let activity = indexer.query(&z).await.unwrap();
    assert_eq!(activity.spends.len(), 1);
    assert_eq!(activity.spends[0].point, TxPoint::new(tx.hash(), 0));
    assert_eq!(activity.spends[0].previous_output, point(0x11, 0));
    assert_eq!(activity.outputs.len(), 1);
    assert_eq!(activity.outputs[0].point, TxPoint::new(tx.hash(), 0));
    assert_eq!(activity.outputs[0].value, 5000);
}

#[tokio::test]
async fn query_of_unknown_address_is_empty_not_an_error() {
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let activity = indexer.query(&address(7)).await.unwrap();
    assert!(activity.outputs.is_empty());
    assert!(activity.spends.is_empty());
}

#[tokio::test]
async fn index_and_deindex_are_inverses() {
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    let keeper = transaction(z, point(0x21, 0), 100);
    indexer.index(&keeper).await.unwrap();
    let before = indexer.query(&z).await.unwrap();

    let tx = transaction(z, point(0x22, 0), 200);
    indexer.index(&tx).await.unwrap();
    indexer.deindex(&tx).await.unwrap();

    assert_eq!(indexer.query(&z).await.unwrap(), before);
}

#[tokio::test]
async fn double_index_is_fatal() {
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let tx = transaction(address(1), point(0x31, 0), 100);
    indexer.index(&tx).await.unwrap();
    let err = indexer.index(&tx).await.unwrap_err();
    assert!(matches!(err, IndexError::DuplicateEntry { .. }));
}

#[tokio::test]
async fn deindex_of_never_indexed_transaction_is_fatal() {
    // Scenario B: this must be an invariant violation, not a silent no-op.
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let tx = transaction(address(1), point(0x41, 0), 100);
    let err = indexer.deindex(&tx).await.unwrap_err();
    assert!(matches!(err, IndexError::MissingEntry { .. }));
}

#[tokio::test]
async fn inputs_without_addresses_are_excluded() {
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    let tx = Transaction {
        inputs: vec![
            TxInput {
                previous_output: point(0x51, 0),
                script: Script::new(vec![0x6a, 0x04]), // non-standard
            },
            TxInput {
                previous_output: point(0x51, 1),
                script: StandardScripts::pay_to_address(&z),
            },
        ],
        outputs: vec![TxOutput {
            value: 9,
            script: Script::new(vec![]),
        }],
    };
    indexer.index(&tx).await.unwrap();

    let activity = indexer.query(&z).await.unwrap();
    assert_eq!(activity.spends.len(), 1);
    assert_eq!(activity.spends[0].point, TxPoint::new(tx.hash(), 1));
    assert!(activity.outputs.is_empty());

    // The excluded slots must not block deindexing either.
    indexer.deindex(&tx).await.unwrap();
    assert_eq!(indexer.query(&z).await.unwrap().spends.len(), 0);
}

#[tokio::test]
async fn no_duplicate_points_under_concurrent_indexing() {
    // Many distinct transactions for the same address, submitted
    // concurrently from cloned handles.
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);

    let mut joins = Vec::new();
    for i in 0..32u8 {
        let handle = indexer.clone();
        let tx = transaction(z, point(i, 0), u64::from(i) + 1);
        joins.push(tokio::spawn(async move { handle.index(&tx).await }));
    }
    for join in joins {
        join.await.unwrap().unwrap();
    }

    let activity = indexer.query(&z).await.unwrap();
    assert_eq!(activity.spends.len(), 32);
    assert_eq!(activity.outputs.len(), 32);

    let mut spend_points: Vec<_> = activity.spends.iter().map(|s| s.point).collect();
    spend_points.sort();
    spend_points.dedup();
    assert_eq!(spend_points.len(), 32);

    let mut output_points: Vec<_> = activity.outputs.iter().map(|o| o.point).collect();
    output_points.sort();
    output_points.dedup();
    assert_eq!(output_points.len(), 32);
}

#[tokio::test]
async fn combined_history_attaches_unconfirmed_spend() {
    // Scenario C: a confirmed unspent row gains an unconfirmed spend.
    let store = NullHistoryStore::new();
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    store.add_row(&z, HistoryRow::unspent(point(0x61, 0), 100, 1000));

    let spender = transaction(z, point(0x61, 0), 900);
    indexer.index(&spender).await.unwrap();

    let rows = fetch_combined_history(&store, &indexer, &z, 0)
        .await
        .unwrap();
    // One confirmed row plus the spender's own unconfirmed output.
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].output, point(0x61, 0));
    assert_eq!(rows[0].output_height, 100);
    assert_eq!(rows[0].value, 1000);
    assert_eq!(rows[0].spend, TxPoint::new(spender.hash(), 0));
    assert_eq!(rows[0].spend_height, UNCONFIRMED_HEIGHT);

    assert_eq!(rows[1].output, TxPoint::new(spender.hash(), 0));
    assert_eq!(rows[1].output_height, UNCONFIRMED_HEIGHT);
    assert_eq!(rows[1].value, 900);
    assert_eq!(rows[1].spend, TxPoint::NULL);
    assert_eq!(rows[1].spend_height, MAX_HEIGHT);
}

#[tokio::test]
async fn combined_history_has_one_row_per_confirmed_and_unconfirmed_output() {
    // P4: |C| + |O| rows, confirmed rows unchanged unless a spend attaches.
    let store = NullHistoryStore::new();
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    store.add_row(&z, HistoryRow::unspent(point(0x71, 0), 50, 111));
    store.add_row(&z, HistoryRow::unspent(point(0x72, 0), 60, 222));

    let tx = transaction(z, point(0x72, 0), 333);
    indexer.index(&tx).await.unwrap();

    let rows = fetch_combined_history(&store, &indexer, &z, 0)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    // Untouched confirmed row is returned unchanged.
    assert_eq!(rows[0], HistoryRow::unspent(point(0x71, 0), 50, 111));
    // The second confirmed row gained the unconfirmed spend.
    assert_eq!(rows[1].spend, TxPoint::new(tx.hash(), 0));
    assert_eq!(rows[1].spend_height, UNCONFIRMED_HEIGHT);
    // The unconfirmed output appears as a fresh unspent row.
    assert_eq!(rows[2].output, TxPoint::new(tx.hash(), 0));
    assert_eq!(rows[2].value, 333);
    assert!(!rows[2].is_spent());
}

#[tokio::test]
async fn combined_history_does_not_depend_on_indexing_order() {
    // P5: the merged view is the same whichever order the unconfirmed
    // transactions arrived in.
    let z = address(1);
    let tx_a = transaction(z, point(0x81, 0), 10);
    let tx_b = transaction(z, point(0x82, 0), 20);

    let mut views = Vec::new();
    for order in [[&tx_a, &tx_b], [&tx_b, &tx_a]] {
        let store = NullHistoryStore::new();
        store.add_row(&z, HistoryRow::unspent(point(0x81, 0), 10, 10));
        store.add_row(&z, HistoryRow::unspent(point(0x82, 0), 20, 20));
        let indexer = TransactionIndexer::spawn(StandardScripts);
        for tx in order {
            indexer.index(tx).await.unwrap();
        }
        let mut rows = fetch_combined_history(&store, &indexer, &z, 0)
            .await
            .unwrap();
        rows.sort_by_key(|row| row.output);
        views.push(rows);
    }
    assert_eq!(views[0], views[1]);
}

#[tokio::test]
async fn store_failure_is_propagated_verbatim() {
    let store = NullHistoryStore::new();
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    store.fail_next(StoreError::Backend("disk offline".into()));

    let err = fetch_combined_history(&store, &indexer, &z, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, HistoryError::Store(StoreError::Backend(_))));
}

#[tokio::test]
async fn unconfirmed_spend_of_unknown_output_is_fatal() {
    let store = NullHistoryStore::new();
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);

    // The spend references an output visible in neither the confirmed
    // history nor the unconfirmed outputs; the output pays a different
    // address so it does not enter z's merge.
    let other = address(2);
    let tx = Transaction {
        inputs: vec![TxInput {
            previous_output: point(0x91, 0),
            script: StandardScripts::pay_to_address(&z),
        }],
        outputs: vec![TxOutput {
            value: 5,
            script: StandardScripts::pay_to_address(&other),
        }],
    };
    indexer.index(&tx).await.unwrap();

    let err = fetch_combined_history(&store, &indexer, &z, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, HistoryError::SpendTargetMissing { .. }));
}

#[tokio::test]
async fn from_height_bounds_confirmed_history() {
    let store = NullHistoryStore::new();
    let indexer = TransactionIndexer::spawn(StandardScripts);
    let z = address(1);
    store.add_row(&z, HistoryRow::unspent(point(0xa1, 0), 10, 1));
    store.add_row(&z, HistoryRow::unspent(point(0xa2, 0), 200, 2));

    let rows = fetch_combined_history(&store, &indexer, &z, 100)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].output, point(0xa2, 0));
}
