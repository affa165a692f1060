use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use splitledger_application::{
    BalanceService, Expense, ExpenseCreated, ExpenseId, ExpenseStore, SmartSplitError,
    SmartSplitProcessor, SplitEditError, SplitEditor, SplitSuggester, SuggestionError,
};
use splitledger_auth::{Claims, Identity, TokenVerifier};
use splitledger_domain::{Money, PaymentRecord, PaymentStatus, UntrustedAllocation};
use splitledger_infrastructure::{JsonProposalParser, MemoryExpenseStore, MemoryPaymentStore};

struct FixedSuggester(&'static str);

impl SplitSuggester for FixedSuggester {
    fn suggest(
        &self,
        _expense: &Expense,
        _group_members: &[String],
    ) -> Result<String, SuggestionError> {
        Ok(self.0.to_owned())
    }
}

struct OfflineSuggester;

impl SplitSuggester for OfflineSuggester {
    fn suggest(
        &self,
        _expense: &Expense,
        _group_members: &[String],
    ) -> Result<String, SuggestionError> {
        Err(SuggestionError::Unavailable("generator offline".to_owned()))
    }
}

static PARSER: JsonProposalParser = JsonProposalParser;

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| (*name).to_owned()).collect()
}

fn expense(id: &str, amount_cents: i64, paid_by: &str, participants: &[&str]) -> Expense {
    Expense {
        id: ExpenseId::new(id),
        group_id: "g1".to_owned(),
        amount: Money::new(amount_cents, 2),
        paid_by: paid_by.to_owned(),
        participants: names(participants),
        description: "shared cost".to_owned(),
        split: None,
        created_at: timestamp(),
    }
}

fn settled(payer: &str, payee: &str, cents: i64) -> PaymentRecord {
    PaymentRecord {
        payer: payer.to_owned(),
        payee: payee.to_owned(),
        amount: Money::new(cents, 2),
        status: PaymentStatus::Succeeded,
        created_at: timestamp(),
        completed_at: Some(timestamp()),
    }
}

fn created(id: &str) -> ExpenseCreated {
    ExpenseCreated {
        expense_id: ExpenseId::new(id),
        group_id: "g1".to_owned(),
    }
}

#[fixture]
fn store() -> MemoryExpenseStore {
    let store = MemoryExpenseStore::new();
    store.insert_group("g1", names(&["alice", "bob", "carol"]));
    store
}

fn entries(expense: &Expense) -> Vec<(String, Money)> {
    expense
        .split
        .as_ref()
        .expect("split not persisted")
        .iter()
        .map(|(name, amount)| (name.to_owned(), amount))
        .collect()
}

#[rstest]
#[case::close_proposal_preserved(
    2000,
    &["alice", "bob"],
    "Here you go:\n```json\n{\"alice\": 12.00, \"bob\": 8.00}\n```",
    &[("alice", 1200), ("bob", 800)]
)]
#[case::hallucinated_total_falls_back(
    10000,
    &["alice", "bob", "carol"],
    r#"{"alice": 400.00, "bob": 100.00, "carol": 2.00}"#,
    &[("alice", 3333), ("bob", 3333), ("carol", 3334)]
)]
#[case::undeclared_name_near_total_is_dropped(
    2000,
    &["alice", "bob"],
    r#"{"alice": 12.00, "bob": 8.00, "carol": 0.01}"#,
    &[("alice", 1200), ("bob", 800)]
)]
#[case::no_json_in_response_falls_back(
    3000,
    &["alice", "bob"],
    "just split it however seems fair",
    &[("alice", 1500), ("bob", 1500)]
)]
fn smart_split_persists_reconciled_allocation(
    store: MemoryExpenseStore,
    #[case] amount_cents: i64,
    #[case] participants: &[&str],
    #[case] response: &'static str,
    #[case] expected: &[(&str, i64)],
) {
    store.insert_expense(expense("e1", amount_cents, "alice", participants));
    let suggester = FixedSuggester(response);
    let processor = SmartSplitProcessor::new(&store, &suggester, &PARSER);

    let split = processor.handle_expense_created(&created("e1")).unwrap();

    assert_eq!(split.total(), Money::new(amount_cents, 2));
    let stored = store.find(&ExpenseId::new("e1")).unwrap();
    let expected: Vec<(String, Money)> = expected
        .iter()
        .map(|(name, cents)| ((*name).to_owned(), Money::new(*cents, 2)))
        .collect();
    assert_eq!(entries(&stored), expected);
}

#[rstest]
fn generator_failure_still_persists_equal_split(store: MemoryExpenseStore) {
    store.insert_expense(expense("e1", 5555, "alice", &["alice", "bob"]));
    let processor = SmartSplitProcessor::new(&store, &OfflineSuggester, &PARSER);

    let split = processor.handle_expense_created(&created("e1")).unwrap();

    assert_eq!(split.total(), Money::new(5555, 2));
    assert_eq!(split.get("alice"), Some(Money::new(2778, 2)));
    assert_eq!(split.get("bob"), Some(Money::new(2777, 2)));
}

#[rstest]
fn unknown_expense_is_a_typed_error(store: MemoryExpenseStore) {
    let processor = SmartSplitProcessor::new(&store, &OfflineSuggester, &PARSER);

    assert_eq!(
        processor.handle_expense_created(&created("ghost")),
        Err(SmartSplitError::ExpenseNotFound("ghost".to_owned()))
    );
}

#[rstest]
fn unknown_group_is_a_typed_error() {
    let store = MemoryExpenseStore::new();
    store.insert_expense(expense("e1", 1000, "alice", &["alice", "bob"]));
    let processor = SmartSplitProcessor::new(&store, &OfflineSuggester, &PARSER);

    assert_eq!(
        processor.handle_expense_created(&created("e1")),
        Err(SmartSplitError::GroupNotFound("g1".to_owned()))
    );
}

fn identity(username: &str) -> Identity {
    Identity {
        username: username.to_owned(),
    }
}

fn manual(entries: &[(&str, &str)]) -> UntrustedAllocation {
    entries
        .iter()
        .map(|(name, amount)| ((*name).to_owned(), amount.parse::<Decimal>().unwrap()))
        .collect()
}

#[rstest]
fn payer_can_replace_the_split(store: MemoryExpenseStore) {
    store.insert_expense(expense("e1", 2000, "alice", &["alice", "bob"]));
    let editor = SplitEditor::new(&store);

    let split = editor
        .apply(
            &identity("alice"),
            &ExpenseId::new("e1"),
            manual(&[("alice", "5.00"), ("bob", "15.00")]),
        )
        .unwrap();

    assert_eq!(split.get("alice"), Some(Money::new(500, 2)));
    assert_eq!(split.get("bob"), Some(Money::new(1500, 2)));
    assert_eq!(
        store.find(&ExpenseId::new("e1")).unwrap().split,
        Some(split)
    );
}

#[rstest]
fn non_payer_edit_is_forbidden(store: MemoryExpenseStore) {
    store.insert_expense(expense("e1", 2000, "alice", &["alice", "bob"]));
    let editor = SplitEditor::new(&store);

    let result = editor.apply(
        &identity("bob"),
        &ExpenseId::new("e1"),
        manual(&[("alice", "10.00"), ("bob", "10.00")]),
    );

    assert_eq!(result, Err(SplitEditError::Forbidden));
    assert_eq!(store.find(&ExpenseId::new("e1")).unwrap().split, None);
}

#[rstest]
fn edit_naming_non_participants_is_rejected(store: MemoryExpenseStore) {
    store.insert_expense(expense("e1", 2000, "alice", &["alice", "bob"]));
    let editor = SplitEditor::new(&store);

    let result = editor.apply(
        &identity("alice"),
        &ExpenseId::new("e1"),
        manual(&[("alice", "10.00"), ("carol", "10.00")]),
    );

    assert_eq!(
        result,
        Err(SplitEditError::NonParticipants(vec!["carol".to_owned()]))
    );
    assert_eq!(store.find(&ExpenseId::new("e1")).unwrap().split, None);
}

#[rstest]
fn edit_with_wrong_sum_is_still_reconciled(store: MemoryExpenseStore) {
    store.insert_expense(expense("e1", 2000, "alice", &["alice", "bob"]));
    let editor = SplitEditor::new(&store);

    // 12.00 + 9.00 is off by 1.00; the manual proposal is discarded for
    // an equal split rather than stored as-is.
    let split = editor
        .apply(
            &identity("alice"),
            &ExpenseId::new("e1"),
            manual(&[("alice", "12.00"), ("bob", "9.00")]),
        )
        .unwrap();

    assert_eq!(split.get("alice"), Some(Money::new(1000, 2)));
    assert_eq!(split.get("bob"), Some(Money::new(1000, 2)));
}

#[test]
fn balance_report_for_verified_identity() {
    let verifier = TokenVerifier::new(b"shared-test-secret".to_vec());
    let token = verifier
        .mint(&Claims {
            sub: "A".to_owned(),
            exp: timestamp().timestamp() + 3600,
        })
        .unwrap();
    let subject = verifier.verify_bearer(&token, timestamp()).unwrap();

    let payments = MemoryPaymentStore::new();
    payments.record(settled("A", "B", 3000));
    payments.record(settled("B", "A", 1000));
    payments.record(PaymentRecord {
        status: PaymentStatus::Pending,
        ..settled("A", "B", 99_000)
    });

    let report = BalanceService::new(&payments).report_for(&subject);

    assert_eq!(report.username, "A");
    assert_eq!(report.owes, Money::new(3000, 2));
    assert_eq!(report.owed_by, Money::new(1000, 2));
    assert_eq!(report.net_balance, Money::new(-2000, 2));
    assert_eq!(report.balances_to_settle.len(), 1);
    assert_eq!(report.balances_to_settle[0].from_user, "A");
    assert_eq!(report.balances_to_settle[0].to_user, "B");
    assert_eq!(report.balances_to_settle[0].amount, Money::new(2000, 2));
}
