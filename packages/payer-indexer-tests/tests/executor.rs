use payer_indexer::{
    prelude::*, Database, DatabaseError, EntityError, ExecutionSummary, Executor,
    IndexerError, PayerIndexExecutor,
};
use payer_indexer_lib::{manifest::Contract, utils::deserialize};
use payer_indexer_plugin::Entity;
use payer_indexer_tests::{
    defaults::START_BLOCK,
    fixtures::{
        account, manifest, paid_back_debt_log, payer_contract, registered_debt_log,
        tokens, tx_hash,
    },
};

fn executor() -> PayerIndexExecutor {
    PayerIndexExecutor::new(manifest(), Database::new()).unwrap()
}

fn debts(executor: &PayerIndexExecutor) -> Vec<Debt> {
    executor.db().entities().unwrap()
}

fn changes(executor: &PayerIndexExecutor) -> Vec<DebtChange> {
    executor.db().entities().unwrap()
}

#[tokio::test]
async fn test_executor_indexes_registration_then_repayment() {
    let mut executor = executor();

    let summary = executor
        .handle_events(vec![
            registered_debt_log(account(1), tokens(1_000_000), tx_hash(1), 0),
            paid_back_debt_log(account(1), tokens(300_000), tokens(700_000), tx_hash(2), 3),
        ])
        .await
        .unwrap();

    assert_eq!(
        summary,
        ExecutionSummary {
            processed: 2,
            skipped: 0
        }
    );

    let debts = debts(&executor);
    assert_eq!(debts.len(), 1);
    assert_eq!(debts[0].amount.to_string(), "700000000000");

    let changes = changes(&executor);
    let amounts: Vec<String> = changes.iter().map(|c| c.amount.to_string()).collect();
    assert_eq!(amounts, vec!["1000000000000", "-300000000000"]);
}

#[tokio::test]
async fn test_executor_skips_foreign_and_out_of_range_logs() {
    let mut executor = executor();

    let mut foreign = registered_debt_log(account(1), tokens(1), tx_hash(1), 0);
    foreign.address = account(0xee);

    let mut early = registered_debt_log(account(1), tokens(1), tx_hash(1), 1);
    early.block_number = START_BLOCK - 1;

    let summary = executor.handle_events(vec![foreign, early]).await.unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 2);
    assert!(debts(&executor).is_empty());
}

#[tokio::test]
async fn test_executor_skips_undecodable_logs() {
    let mut executor = executor();

    let mut truncated = registered_debt_log(account(1), tokens(1), tx_hash(1), 0);
    truncated.data = HexBytes::new(vec![0u8; 31]);

    let mut unknown = registered_debt_log(account(1), tokens(1), tx_hash(1), 1);
    unknown.topics = vec![Bytes32::new([0x42; 32])];

    let good = registered_debt_log(account(1), tokens(5), tx_hash(1), 2);

    let summary = executor
        .handle_events(vec![truncated, unknown, good])
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 2);
    assert_eq!(debts(&executor)[0].amount, BigInt::from(5_000_000));
}

#[tokio::test]
async fn test_executor_skips_events_without_route() {
    let mut manifest =
        Manifest::new("nouns", "token_buyer", Contract::new(payer_contract()));
    manifest.add_event_handler(RegisteredDebt::NAME, "handleRegisteredDebt");
    let mut executor = PayerIndexExecutor::new(manifest, Database::new()).unwrap();

    let summary = executor
        .handle_events(vec![
            registered_debt_log(account(1), tokens(10), tx_hash(1), 0),
            paid_back_debt_log(account(1), tokens(4), tokens(6), tx_hash(2), 0),
        ])
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(debts(&executor)[0].amount, BigInt::from(10_000_000));
    assert_eq!(changes(&executor).len(), 1);
}

#[tokio::test]
async fn test_dropped_repayment_commits_nothing() {
    let mut executor = executor();

    let summary = executor
        .handle_events(vec![paid_back_debt_log(
            account(9),
            tokens(1),
            tokens(0),
            tx_hash(1),
            0,
        )])
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert!(debts(&executor).is_empty());
    assert!(changes(&executor).is_empty());
    assert!(!executor.db().in_transaction());
}

#[tokio::test]
async fn test_executor_stops_on_handler_failure_and_keeps_earlier_commits() {
    let mut db = Database::new();
    db.load_schema(&manifest());
    db.start_transaction().unwrap();
    db.put_object(Debt::type_id(), &account(2).to_hex(), vec![0xff])
        .unwrap();
    db.commit_transaction().unwrap();

    let mut executor = PayerIndexExecutor::new(manifest(), db).unwrap();

    let err = executor
        .handle_events(vec![
            registered_debt_log(account(1), tokens(1), tx_hash(1), 0),
            registered_debt_log(account(2), tokens(1), tx_hash(1), 1),
            registered_debt_log(account(3), tokens(1), tx_hash(1), 2),
        ])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IndexerError::EntityError(EntityError::BincodeError(_))
    ));
    assert!(!executor.db().in_transaction());

    assert_eq!(executor.db().count(Debt::type_id()), 2);
    let (_, bytes) = executor
        .db()
        .objects(Debt::type_id())
        .find(|(id, _)| *id == account(1).to_hex())
        .unwrap();
    let debt: Debt = deserialize(bytes).unwrap();
    assert_eq!(debt.amount, BigInt::from(1_000_000));

    let changes = changes(&executor);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].address, account(1));
}

#[test]
fn test_database_error_surfaces_through_entity_error() {
    let err: EntityError = DatabaseError::UnknownTypeId(7).into();

    assert_eq!(err.to_string(), "Entity store error: TypeId(7) not found in tables.");
}
