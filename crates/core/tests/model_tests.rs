// ═══════════════════════════════════════════════════════════════════
// Model Tests — transactions, accounts, goals, seed data, FinanceState,
// configuration
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

use smartfinance_core::config::{AppConfig, RemoteConfig, ENV_API_KEY, ENV_FIREBASE_API_KEY,
    ENV_FIREBASE_PROJECT_ID, ENV_GEMINI_API_KEY, ENV_OFFLINE, PLACEHOLDER_API_KEY};
use smartfinance_core::errors::CoreError;
use smartfinance_core::models::account::BankAccount;
use smartfinance_core::models::dream::{DreamAccount, NewDream, DEFAULT_DREAM_ICON};
use smartfinance_core::models::report::{BudgetComparison, MonthlyTotals};
use smartfinance_core::models::seed;
use smartfinance_core::models::state::{Field, FieldUpdate, FinanceState};
use smartfinance_core::models::transaction::{Category, Transaction, TransactionType};
use smartfinance_core::models::user::{User, DEFAULT_DISPLAY_NAME, DEMO_USER_ID};
use smartfinance_core::remote::traits::Document;
use smartfinance_core::sync::selector::{BackendSelector, SyncMode};

fn d(v: i64) -> Decimal {
    Decimal::from(v)
}

fn date(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let pairs: Vec<(String, String)> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

// ═══════════════════════════════════════════════════════════════════
// Transaction
// ═══════════════════════════════════════════════════════════════════

mod transaction {
    use super::*;

    fn lunch() -> Transaction {
        Transaction {
            id: "t9".into(),
            account_id: "1".into(),
            amount: d(120),
            transaction_type: TransactionType::Expense,
            category: Category::Food,
            description: "Lunch".into(),
            date: date(2023, 12, 6),
        }
    }

    #[test]
    fn signed_amount_follows_type() {
        let expense = lunch();
        assert_eq!(expense.signed_amount(), d(-120));

        let income = Transaction {
            transaction_type: TransactionType::Income,
            ..lunch()
        };
        assert_eq!(income.signed_amount(), d(120));
    }

    #[test]
    fn json_uses_document_keys() {
        let value = serde_json::to_value(lunch()).unwrap();
        assert_eq!(value["accountId"], "1");
        assert_eq!(value["type"], "EXPENSE");
        assert_eq!(value["category"], "飲食");
        assert_eq!(value["date"], "2023-12-06");
        assert_eq!(value["amount"].as_f64(), Some(120.0));
        assert!(value.get("account_id").is_none());
    }

    #[test]
    fn decodes_document_written_by_web_client() {
        let value = json!({
            "id": "t1",
            "accountId": "1",
            "amount": 45000,
            "type": "INCOME",
            "category": "薪資",
            "description": "December salary",
            "date": "2023-12-05"
        });
        let tx: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Income);
        assert_eq!(tx.category, Category::Salary);
        assert_eq!(tx.amount, d(45_000));
    }

    #[test]
    fn category_display_is_english() {
        assert_eq!(Category::Food.to_string(), "Food");
        assert_eq!(Category::Entertainment.to_string(), "Entertainment");
        assert_eq!(TransactionType::Expense.to_string(), "Expense");
    }

    #[test]
    fn budgetable_excludes_income_categories() {
        let cats = Category::budgetable();
        assert_eq!(cats.len(), 6);
        assert!(!cats.contains(&Category::Salary));
        assert!(!cats.contains(&Category::Investment));
        assert!(cats.contains(&Category::Other));
    }

    #[test]
    fn unknown_category_label_is_rejected() {
        let result = serde_json::from_value::<Category>(json!("Groceries"));
        assert!(result.is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Accounts, goals, users
// ═══════════════════════════════════════════════════════════════════

mod entities {
    use super::*;

    #[test]
    fn account_json_keys() {
        let acc = &seed::initial_accounts()[0];
        let value = serde_json::to_value(acc).unwrap();
        assert_eq!(value["bankName"], "Cathay United Bank");
        assert_eq!(value["balance"].as_f64(), Some(50_000.0));
        let back: BankAccount = serde_json::from_value(value).unwrap();
        assert_eq!(&back, acc);
    }

    #[test]
    fn dream_progress_percent() {
        let kyoto = &seed::initial_dreams()[0];
        assert_eq!(kyoto.progress_percent(), d(25));
        assert_eq!(kyoto.remaining(), d(45_000));
    }

    #[test]
    fn dream_progress_caps_at_hundred() {
        let dream = DreamAccount {
            id: "x".into(),
            title: "Done".into(),
            target_amount: d(100),
            current_amount: d(250),
            icon: "⭐".into(),
            color: "bg-rose-500".into(),
        };
        assert_eq!(dream.progress_percent(), d(100));
        assert_eq!(dream.remaining(), Decimal::ZERO);
    }

    #[test]
    fn dream_with_zero_target_reports_zero() {
        let dream = DreamAccount {
            target_amount: Decimal::ZERO,
            ..seed::initial_dreams()[0].clone()
        };
        assert_eq!(dream.progress_percent(), Decimal::ZERO);
    }

    #[test]
    fn dream_json_keys() {
        let value = serde_json::to_value(&seed::initial_dreams()[1]).unwrap();
        assert_eq!(value["targetAmount"].as_f64(), Some(5_000.0));
        assert_eq!(value["currentAmount"].as_f64(), Some(2_400.0));
        assert_eq!(value["icon"], "🎄");
    }

    #[test]
    fn new_dream_defaults_icon() {
        let input = NewDream::new("Bike", d(8_000));
        assert_eq!(input.icon, DEFAULT_DREAM_ICON);
        assert_eq!(input.with_icon("🚲").icon, "🚲");
    }

    #[test]
    fn demo_user_falls_back_to_default_name() {
        let user = User::demo("me@example.com", "   ");
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.name, DEFAULT_DISPLAY_NAME);

        let named = User::demo("me@example.com", "Mei");
        assert_eq!(named.name, "Mei");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Seed data
// ═══════════════════════════════════════════════════════════════════

mod seed_data {
    use super::*;

    #[test]
    fn initial_accounts() {
        let accounts = seed::initial_accounts();
        let ids: Vec<&str> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(accounts[0].balance, d(50_000));
        assert_eq!(accounts[1].balance, d(12_000));
        assert_eq!(accounts[2].balance, d(3_500));
    }

    #[test]
    fn initial_transactions_reference_seed_accounts() {
        let accounts = seed::initial_accounts();
        for tx in seed::initial_transactions() {
            assert!(accounts.iter().any(|a| a.id == tx.account_id), "{}", tx.id);
            assert!(tx.amount > Decimal::ZERO);
        }
    }

    #[test]
    fn initial_budgets_have_unique_categories() {
        let budgets = seed::initial_budgets();
        let mut cats: Vec<Category> = budgets.iter().map(|b| b.category).collect();
        cats.sort();
        cats.dedup();
        assert_eq!(cats.len(), budgets.len());
    }

    #[test]
    fn initial_dreams() {
        let dreams = seed::initial_dreams();
        assert_eq!(dreams.len(), 3);
        assert!(dreams.iter().all(|d| d.current_amount <= d.target_amount));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FinanceState / documents
// ═══════════════════════════════════════════════════════════════════

mod finance_state {
    use super::*;

    #[test]
    fn seed_is_not_empty_default_is() {
        assert!(FinanceState::default().is_empty());
        assert!(!FinanceState::seed().is_empty());
    }

    #[test]
    fn document_round_trip() {
        let state = FinanceState::seed();
        let doc = state.to_document().unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        for field in Field::ALL {
            assert!(keys.contains(&field.as_str()));
        }
        assert_eq!(FinanceState::from_document(&doc), state);
    }

    #[test]
    fn missing_field_falls_back_to_seed() {
        let mut doc = Document::new();
        doc.insert("budgets".into(), json!([{ "category": "娛樂", "limit": 100 }]));
        let state = FinanceState::from_document(&doc);
        assert_eq!(state.budgets.len(), 1);
        assert_eq!(state.budgets[0].limit, d(100));
        assert_eq!(state.accounts, seed::initial_accounts());
        assert_eq!(state.transactions, seed::initial_transactions());
        assert_eq!(state.dreams, seed::initial_dreams());
    }

    #[test]
    fn null_or_garbage_field_falls_back_to_seed() {
        let mut doc = Document::new();
        doc.insert("accounts".into(), serde_json::Value::Null);
        doc.insert("dreams".into(), json!("not a list"));
        let state = FinanceState::from_document(&doc);
        assert_eq!(state.accounts, seed::initial_accounts());
        assert_eq!(state.dreams, seed::initial_dreams());
    }

    #[test]
    fn empty_list_is_kept() {
        let mut doc = FinanceState::seed().to_document().unwrap();
        doc.insert("transactions".into(), json!([]));
        let state = FinanceState::from_document(&doc);
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn apply_replaces_one_field() {
        let mut state = FinanceState::seed();
        state.apply(FieldUpdate::Budgets(vec![]));
        assert!(state.budgets.is_empty());
        assert_eq!(state.accounts, seed::initial_accounts());
    }

    #[test]
    fn into_updates_covers_every_field() {
        let fields: Vec<Field> = FinanceState::seed()
            .into_updates()
            .iter()
            .map(FieldUpdate::field)
            .collect();
        assert_eq!(fields, Field::ALL);
    }

    #[test]
    fn field_parsing() {
        assert_eq!("dreams".parse::<Field>().unwrap(), Field::Dreams);
        assert_eq!(Field::Accounts.to_string(), "accounts");
        assert!(matches!(
            "user".parse::<Field>(),
            Err(CoreError::ValidationError(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Report models
// ═══════════════════════════════════════════════════════════════════

mod reports {
    use super::*;

    #[test]
    fn spending_ratio_against_income() {
        let totals = MonthlyTotals {
            income: d(1_000),
            expense: d(250),
        };
        assert_eq!(totals.spending_ratio(), d(25));
        assert_eq!(totals.net(), d(750));
    }

    #[test]
    fn spending_ratio_without_income_is_capped() {
        let totals = MonthlyTotals {
            income: Decimal::ZERO,
            expense: d(10),
        };
        assert_eq!(totals.spending_ratio(), d(100));
        assert_eq!(MonthlyTotals::default().spending_ratio(), Decimal::ZERO);
    }

    #[test]
    fn budget_comparison_over_and_remaining() {
        let cmp = BudgetComparison {
            category: Category::Food,
            limit: d(100),
            spent: d(130),
        };
        assert!(cmp.is_over());
        assert_eq!(cmp.remaining(), d(-30));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Configuration & backend selection
// ═══════════════════════════════════════════════════════════════════

mod configuration {
    use super::*;

    #[test]
    fn placeholder_key_is_invalid() {
        assert!(!RemoteConfig::new(PLACEHOLDER_API_KEY, "proj").is_valid());
        assert!(!RemoteConfig::new("", "proj").is_valid());
        assert!(!RemoteConfig::new("key", "  ").is_valid());
        assert!(RemoteConfig::new("key", "proj").is_valid());
    }

    #[test]
    fn default_database_and_collection() {
        let cfg = RemoteConfig::new("key", "proj");
        assert_eq!(cfg.database(), "(default)");
        assert_eq!(cfg.user_collection(), "users");
    }

    #[test]
    fn settings_json_is_camel_case() {
        let cfg = AppConfig::from_json_str(
            r#"{
                "firebase": { "apiKey": "abc", "projectId": "smart-finance", "authDomain": "x" },
                "advice": { "model": "gemini-pro" },
                "pollIntervalMs": 500
            }"#,
        )
        .unwrap();
        let remote = cfg.remote.as_ref().unwrap();
        assert_eq!(remote.api_key, "abc");
        assert_eq!(remote.project_id, "smart-finance");
        assert_eq!(cfg.advice.model, "gemini-pro");
        assert_eq!(cfg.poll_interval().as_millis(), 500);
        assert!(!cfg.offline);
    }

    #[test]
    fn invalid_settings_is_config_error() {
        let err = AppConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("settings.json")).unwrap();
        assert_eq!(cfg.poll_interval_ms, AppConfig::default().poll_interval_ms);
    }

    #[test]
    fn load_timeout_from_settings() {
        assert_eq!(AppConfig::default().load_timeout().as_secs(), 10);
        let cfg = AppConfig::from_json_str(r#"{ "loadTimeoutMs": 250 }"#).unwrap();
        assert_eq!(cfg.load_timeout().as_millis(), 250);
    }

    #[test]
    fn poll_interval_has_floor() {
        let cfg = AppConfig {
            poll_interval_ms: 1,
            ..AppConfig::default()
        };
        assert_eq!(cfg.poll_interval().as_millis(), 100);
    }

    #[test]
    fn env_overrides_fill_remote_config() {
        let cfg = AppConfig::default().with_env(env(&[
            (ENV_FIREBASE_API_KEY, "env-key"),
            (ENV_FIREBASE_PROJECT_ID, "env-proj"),
        ]));
        let remote = cfg.remote.unwrap();
        assert_eq!(remote.api_key, "env-key");
        assert_eq!(remote.project_id, "env-proj");
    }

    #[test]
    fn advice_key_prefers_gemini_variable() {
        let cfg = AppConfig::default()
            .with_env(env(&[(ENV_GEMINI_API_KEY, "g"), (ENV_API_KEY, "a")]));
        assert_eq!(cfg.advice.api_key.as_deref(), Some("g"));

        let cfg = AppConfig::default().with_env(env(&[(ENV_API_KEY, "a")]));
        assert_eq!(cfg.advice.api_key.as_deref(), Some("a"));
    }

    #[test]
    fn selector_without_remote_is_local() {
        let selector = BackendSelector::from_config(&AppConfig::offline());
        assert!(!selector.is_remote_active());
        assert_eq!(selector.mode(), SyncMode::Local);
    }

    #[test]
    fn selector_with_valid_remote_is_remote() {
        let cfg = AppConfig::with_remote(RemoteConfig::new("key", "proj"));
        let selector = BackendSelector::from_config(&cfg);
        assert!(selector.is_remote_active());
        assert_eq!(selector.mode().to_string(), "remote");
    }

    #[test]
    fn selector_with_placeholder_is_local() {
        let cfg = AppConfig::with_remote(RemoteConfig::new(PLACEHOLDER_API_KEY, "proj"));
        assert!(!BackendSelector::from_config(&cfg).is_remote_active());
    }

    #[test]
    fn offline_override_forces_local() {
        let cfg = AppConfig::with_remote(RemoteConfig::new("key", "proj"))
            .with_env(env(&[(ENV_OFFLINE, "1")]));
        assert!(cfg.offline);
        assert_eq!(BackendSelector::from_config(&cfg).mode(), SyncMode::Local);
    }
}
