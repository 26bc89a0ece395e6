pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod remote;
pub mod services;
pub mod storage;
pub mod sync;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::watch;

use config::AppConfig;
use errors::CoreError;
use models::{
    account::{BankAccount, NewAccount},
    budget::Budget,
    dream::{DreamAccount, NewDream},
    report::{BudgetComparison, CategoryTotal, DashboardSummary},
    seed,
    state::{Field, FieldUpdate, FinanceState},
    transaction::{Category, NewTransaction, Transaction},
    user::User,
};
use providers::{gemini::GeminiAdvisor, traits::AdviceProvider};
use remote::{firestore::FirestoreStore, traits::DocumentStore};
use services::{
    advice_service::AdviceService,
    ledger_service::LedgerService,
    lucky_service::{LuckyDraw, LuckyService},
    report_service::ReportService,
};
use storage::{
    backup::BackupManager,
    local::{FileLocalStore, LocalAdapter, LocalStore, MemoryLocalStore, USER_KEY},
};
use sync::{
    coordinator::{MutationCoordinator, SyncTarget},
    remote::{RemoteSyncAdapter, Subscription},
    selector::{BackendSelector, SyncMode},
    state::StateStore,
};

/// Where the session is in its sign-in lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    /// Transient: the startup check is running.
    AuthLoading,
    Authenticated { user: User, mode: SyncMode },
}

/// Main entry point of the SmartFinance core library.
///
/// Owns the session, the in-memory state and every service operating on it.
/// All writes go through one [`MutationCoordinator`]; in remote mode the
/// state only changes when the subscription reports the new document.
#[must_use]
pub struct FinanceTracker {
    config: AppConfig,
    selector: BackendSelector,
    local: LocalAdapter,
    remote: Option<RemoteSyncAdapter>,
    state: StateStore,
    session: SessionState,
    coordinator: Option<MutationCoordinator>,
    subscription: Option<Subscription>,
    ledger: LedgerService,
    reports: ReportService,
    advice: AdviceService,
    lucky: LuckyService,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("mode", &self.selector.mode())
            .field("session", &self.session)
            .field("state", &self.state)
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}

/// Explicit wiring for a [`FinanceTracker`]. Backends left unset are built
/// from the configuration.
#[must_use]
pub struct FinanceTrackerBuilder {
    config: AppConfig,
    local_store: Option<Arc<dyn LocalStore>>,
    document_store: Option<Arc<dyn DocumentStore>>,
    advisor: Option<Box<dyn AdviceProvider>>,
}

impl FinanceTrackerBuilder {
    pub fn local_store(mut self, store: Arc<dyn LocalStore>) -> Self {
        self.local_store = Some(store);
        self
    }

    /// Remote backend; only used when the configuration selects remote mode.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.document_store = Some(store);
        self
    }

    pub fn advisor(mut self, advisor: Box<dyn AdviceProvider>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn build(self) -> FinanceTracker {
        let config = self.config;
        let selector = BackendSelector::from_config(&config);

        let local_store: Arc<dyn LocalStore> = match (self.local_store, &config.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileLocalStore::new(dir.clone())),
            (None, None) => Arc::new(MemoryLocalStore::new()),
        };

        let remote = match (selector.mode(), &config.remote) {
            (SyncMode::Remote, Some(remote_config)) => {
                let store: Arc<dyn DocumentStore> = match self.document_store {
                    Some(store) => store,
                    None => Arc::new(FirestoreStore::new(
                        remote_config.clone(),
                        config.poll_interval(),
                    )),
                };
                Some(RemoteSyncAdapter::new(store))
            }
            _ => None,
        };

        let advisor = self.advisor.or_else(|| {
            config.advice.api_key.clone().map(|key| {
                Box::new(GeminiAdvisor::new(key, config.advice.model.clone()))
                    as Box<dyn AdviceProvider>
            })
        });

        log::info!(
            "finance tracker ready: {} mode, local store {}",
            selector.mode(),
            local_store.name()
        );

        FinanceTracker {
            selector,
            local: LocalAdapter::new(local_store),
            remote,
            state: StateStore::new(),
            session: SessionState::Unauthenticated,
            coordinator: None,
            subscription: None,
            ledger: LedgerService::new(),
            reports: ReportService::new(),
            advice: AdviceService::new(advisor),
            lucky: LuckyService::new(),
            config,
        }
    }
}

impl FinanceTracker {
    pub fn builder(config: AppConfig) -> FinanceTrackerBuilder {
        FinanceTrackerBuilder {
            config,
            local_store: None,
            document_store: None,
            advisor: None,
        }
    }

    /// Tracker with every backend derived from `config`.
    pub fn from_config(config: AppConfig) -> Self {
        Self::builder(config).build()
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Startup check. In local mode a previously signed-in user is restored;
    /// otherwise the session ends up unauthenticated.
    pub fn start(&mut self) -> Result<&SessionState, CoreError> {
        self.session = SessionState::AuthLoading;

        let saved = match self.selector.mode() {
            SyncMode::Local => self.local.load::<Option<User>>(USER_KEY, None),
            SyncMode::Remote => None,
        };
        match saved {
            Some(user) => {
                log::info!("restoring saved session for user {}", user.id);
                self.sign_in(user)?;
            }
            None => self.session = SessionState::Unauthenticated,
        }
        Ok(&self.session)
    }

    /// Start a session for `user`, replacing any current one.
    ///
    /// Local mode persists the user and loads the saved collections (seed
    /// data for anything never saved). Remote mode subscribes to the user's
    /// document and must run inside a tokio runtime.
    pub fn sign_in(&mut self, user: User) -> Result<(), CoreError> {
        if self.coordinator.is_some() {
            self.sign_out();
        }
        self.session = SessionState::AuthLoading;

        let mode = self.selector.mode();
        let target = match (self.remote.clone(), mode) {
            (Some(adapter), SyncMode::Remote) => {
                let generation = self.state.reset();
                let state = self.state.clone();
                let on_change = move |snapshot| {
                    if !state.replace_if_current(generation, snapshot) {
                        log::debug!("dropping snapshot from an ended session");
                    }
                };
                match adapter.subscribe(&user.id, on_change) {
                    Ok(subscription) => self.subscription = Some(subscription),
                    Err(e) => {
                        self.session = SessionState::Unauthenticated;
                        return Err(e);
                    }
                }
                SyncTarget::Remote {
                    adapter,
                    user_id: user.id.clone(),
                }
            }
            _ => {
                if let Err(e) = self.local.save(USER_KEY, &user) {
                    log::warn!("could not remember signed-in user: {e}");
                }
                self.state.reset();
                self.state.replace(self.load_local_state());
                SyncTarget::Local {
                    adapter: self.local.clone(),
                }
            }
        };

        log::info!("user {} signed in ({mode} mode)", user.id);
        self.coordinator = Some(MutationCoordinator::new(target, self.state.clone()));
        self.session = SessionState::Authenticated { user, mode };
        Ok(())
    }

    /// End the session: stop notifications, clear in-memory data and forget
    /// the saved user. Stored collections are kept for the next sign-in.
    pub fn sign_out(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.coordinator = None;
        self.state.reset();
        if let Err(e) = self.local.save(USER_KEY, &None::<User>) {
            log::warn!("could not clear saved user: {e}");
        }
        if let SessionState::Authenticated { user, .. } = &self.session {
            log::info!("user {} signed out", user.id);
        }
        self.session = SessionState::Unauthenticated;
    }

    fn load_local_state(&self) -> FinanceState {
        FinanceState {
            accounts: self
                .local
                .load(Field::Accounts.as_str(), seed::initial_accounts()),
            transactions: self
                .local
                .load(Field::Transactions.as_str(), seed::initial_transactions()),
            budgets: self
                .local
                .load(Field::Budgets.as_str(), seed::initial_budgets()),
            dreams: self
                .local
                .load(Field::Dreams.as_str(), seed::initial_dreams()),
        }
    }

    fn coordinator(&self) -> Result<&MutationCoordinator, CoreError> {
        self.coordinator.as_ref().ok_or(CoreError::NotAuthenticated)
    }

    /// Coordinator of a session whose data has arrived. A remote session
    /// waits for its first snapshot, since every write replaces whole
    /// collections computed from the current state.
    async fn loaded_coordinator(&self) -> Result<&MutationCoordinator, CoreError> {
        let coordinator = self.coordinator()?;
        self.state.wait_loaded(self.config.load_timeout()).await?;
        Ok(coordinator)
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        match &self.session {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> SyncMode {
        self.selector.mode()
    }

    #[must_use]
    pub fn is_remote_active(&self) -> bool {
        self.selector.is_remote_active()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Record a transaction and move its account's balance in one write.
    pub async fn add_transaction(&self, input: NewTransaction) -> Result<Transaction, CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let posting = self
            .state
            .read(|s| self.ledger.post_transaction(s, input))?;
        let transaction = posting.transaction.clone();
        coordinator.apply_changes(posting.into_updates()).await?;
        Ok(transaction)
    }

    /// Remove a transaction. The account balance is left as it is.
    pub async fn delete_transaction(&self, id: &str) -> Result<(), CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let transactions = self
            .state
            .read(|s| self.ledger.remove_transaction(&s.transactions, id));
        coordinator
            .apply_change(FieldUpdate::Transactions(transactions))
            .await
    }

    pub async fn add_account(&self, input: NewAccount) -> Result<BankAccount, CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let (account, accounts) = self
            .state
            .read(|s| self.ledger.open_account(&s.accounts, input))?;
        coordinator.apply_change(FieldUpdate::Accounts(accounts)).await?;
        Ok(account)
    }

    pub async fn delete_account(&self, id: &str) -> Result<(), CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let accounts = self
            .state
            .read(|s| self.ledger.close_account(&s.accounts, id))?;
        coordinator.apply_change(FieldUpdate::Accounts(accounts)).await
    }

    /// Create or update the monthly limit for a category.
    pub async fn set_budget(&self, category: Category, limit: Decimal) -> Result<(), CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let budgets = self
            .state
            .read(|s| self.ledger.upsert_budget(&s.budgets, category, limit))?;
        coordinator.apply_change(FieldUpdate::Budgets(budgets)).await
    }

    pub async fn add_dream(&self, input: NewDream) -> Result<DreamAccount, CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let (dream, dreams) = self
            .state
            .read(|s| self.ledger.create_dream(&s.dreams, input))?;
        coordinator.apply_change(FieldUpdate::Dreams(dreams)).await?;
        Ok(dream)
    }

    /// Put money towards a savings goal. Returns `false` (and writes
    /// nothing) when `amount` is zero or negative.
    pub async fn deposit_to_dream(&self, id: &str, amount: Decimal) -> Result<bool, CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let dreams = self
            .state
            .read(|s| self.ledger.deposit(&s.dreams, id, amount))?;
        match dreams {
            Some(dreams) => {
                coordinator.apply_change(FieldUpdate::Dreams(dreams)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete_dream(&self, id: &str) -> Result<(), CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let dreams = self
            .state
            .read(|s| self.ledger.abandon_dream(&s.dreams, id))?;
        coordinator.apply_change(FieldUpdate::Dreams(dreams)).await
    }

    /// Replace one collection wholesale.
    pub async fn apply_change(&self, update: FieldUpdate) -> Result<(), CoreError> {
        self.loaded_coordinator().await?.apply_change(update).await
    }

    // ── State ───────────────────────────────────────────────────────

    #[must_use]
    pub fn snapshot(&self) -> FinanceState {
        self.state.snapshot()
    }

    #[must_use]
    pub fn accounts(&self) -> Vec<BankAccount> {
        self.state.read(|s| s.accounts.clone())
    }

    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.read(|s| s.transactions.clone())
    }

    #[must_use]
    pub fn budgets(&self) -> Vec<Budget> {
        self.state.read(|s| s.budgets.clone())
    }

    #[must_use]
    pub fn dreams(&self) -> Vec<DreamAccount> {
        self.state.read(|s| s.dreams.clone())
    }

    /// Receiver that wakes whenever the in-memory state changes.
    pub fn watch_state(&self) -> watch::Receiver<u64> {
        self.state.watch()
    }

    // ── Reports ─────────────────────────────────────────────────────

    #[must_use]
    pub fn total_balance(&self) -> Decimal {
        self.state.read(|s| self.reports.total_balance(&s.accounts))
    }

    #[must_use]
    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        self.state.read(|s| self.reports.dashboard(s, today))
    }

    #[must_use]
    pub fn expense_by_category(&self) -> Vec<CategoryTotal> {
        self.state
            .read(|s| self.reports.expense_by_category(&s.transactions))
    }

    #[must_use]
    pub fn budget_comparison(&self) -> Vec<BudgetComparison> {
        self.state
            .read(|s| self.reports.budget_comparison(&s.transactions, &s.budgets))
    }

    /// Name of the account a transaction was booked on.
    #[must_use]
    pub fn account_label(&self, transaction: &Transaction) -> String {
        self.state
            .read(|s| self.reports.account_label(transaction, &s.accounts).to_string())
    }

    // ── Extras ──────────────────────────────────────────────────────

    /// Advice text for the current ledger. Falls back to a fixed apology
    /// when no advisor is available or the request fails.
    pub async fn financial_advice(&self) -> String {
        let (transactions, budgets) = self
            .state
            .read(|s| (s.transactions.clone(), s.budgets.clone()));
        self.advice.advise(&transactions, &budgets).await
    }

    /// Today's lucky item and color, drawn once per day.
    pub fn lucky_draw(&self, today: NaiveDate) -> Result<LuckyDraw, CoreError> {
        self.lucky.draw(&self.local, today)
    }

    /// Encrypt the current collections with `password`.
    pub fn export_backup(&self, password: &str) -> Result<Vec<u8>, CoreError> {
        self.coordinator()?;
        if !self.state.is_loaded() {
            return Err(CoreError::Sync("user data has not been loaded yet".into()));
        }
        BackupManager::save_to_bytes(&self.state.snapshot(), password)
    }

    /// Replace all four collections with the contents of a backup.
    pub async fn restore_backup(&self, data: &[u8], password: &str) -> Result<(), CoreError> {
        let coordinator = self.loaded_coordinator().await?;
        let restored = BackupManager::load_from_bytes(data, password)?;
        log::info!("restoring backup into {} storage", coordinator.mode());
        coordinator.apply_changes(restored.into_updates()).await
    }
}
