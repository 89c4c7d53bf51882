//! End-to-end tests of the agent runtime against the paper portfolio.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};
use trading_broker::{PaperPortfolio, PositionBook};
use trading_core::context::AgentContext;
use trading_core::error::AgentError;
use trading_core::traits::{share, AgentLogic, Module, OrderDecision, Portfolio};
use trading_core::types::{
    AgentState, Bar, ChartKind, DataStream, Direction, Hook, ModuleRole, OrderRequest,
    OrderStatus, PendingOrder, Position, Tick, Timeframe, Trade,
};

use crate::{AgentConfig, AgentEvent, AgentRunner, LifecycleState, TradingAgent};

type Log = Arc<Mutex<Vec<String>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn position_of(log: &Log, entry: &str) -> usize {
    entries(log)
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{entry} not logged"))
}

struct Recorder {
    name: &'static str,
    role: ModuleRole,
    hooks: &'static [Hook],
    streams: Vec<String>,
    interval: Option<Timeframe>,
    log: Log,
}

impl Recorder {
    fn new(name: &'static str, role: ModuleRole, hooks: &'static [Hook], log: &Log) -> Self {
        Self {
            name,
            role,
            hooks,
            streams: Vec::new(),
            interval: None,
            log: log.clone(),
        }
    }

    fn following(mut self, symbol: &str) -> Self {
        self.streams.push(symbol.to_string());
        self
    }

    fn on_interval(mut self, interval: Timeframe) -> Self {
        self.interval = Some(interval);
        self
    }

    fn record(&self, event: &str) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, event));
    }
}

impl Module for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn role(&self) -> ModuleRole {
        self.role
    }

    fn hooks(&self) -> &[Hook] {
        self.hooks
    }

    fn data_streams(&self) -> &[String] {
        &self.streams
    }

    fn interval(&self) -> Option<Timeframe> {
        self.interval
    }

    fn initialize(&mut self, _ctx: &mut AgentContext<'_>) {
        self.record("init");
    }

    fn on_bar(&mut self, bar: &Bar, ctx: &mut AgentContext<'_>) {
        self.record("bar");
        if ctx.is_backfilling() {
            self.record(&format!("backfill:{}", bar.timestamp));
        }
    }

    fn on_tick(&mut self, _tick: &Tick, _ctx: &mut AgentContext<'_>) {
        self.record("tick");
    }

    fn on_order(&mut self, _order: &PendingOrder, _ctx: &mut AgentContext<'_>) {
        self.record("order");
    }

    fn on_fill(&mut self, _trade: &Trade, _order: &PendingOrder, ctx: &mut AgentContext<'_>) {
        self.record("fill");
        ctx.update_chart(self.name, "fills", ChartKind::Step, dec!(1));
    }

    fn on_position(&mut self, _position: &Position, _ctx: &mut AgentContext<'_>) {
        self.record("position");
    }

    fn on_calculate(&mut self, ctx: &mut AgentContext<'_>) {
        let empty = ctx.decision_state().is_empty();
        self.record(&format!("calculate:{empty}"));
        let symbol = ctx.symbol().to_string();
        match self.role {
            ModuleRole::Entry => {
                ctx.enter_long(&symbol);
            }
            ModuleRole::Exit => {
                ctx.exit_long(&symbol);
            }
            _ => {}
        }
    }
}

/// Risk module: trading gate plus an optional protective stop proposal.
struct Gate {
    name: &'static str,
    allowed: bool,
    stop: Option<Decimal>,
    log: Log,
}

impl Module for Gate {
    fn name(&self) -> &str {
        self.name
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::RiskManagement
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::RiskManagement]
    }

    fn is_trading_allowed(&self, _ctx: &AgentContext<'_>) -> bool {
        self.allowed
    }

    fn risk_management(
        &mut self,
        order: &PendingOrder,
        _state: AgentState,
        ctx: &mut AgentContext<'_>,
    ) -> Option<PendingOrder> {
        self.log.lock().unwrap().push(format!("{}:risk", self.name));
        let stop = self.stop?;
        let request = OrderRequest::stop(
            order.symbol(),
            order.order.direction.opposite(),
            order.order.quantity,
            stop,
        )
        .with_comment(self.name);
        Some(ctx.create_order(&request))
    }
}

struct Sizer(Decimal);

impl Module for Sizer {
    fn name(&self) -> &str {
        "sizer"
    }

    fn role(&self) -> ModuleRole {
        ModuleRole::MoneyManagement
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::PositionSize]
    }

    fn position_size(
        &mut self,
        order: &mut PendingOrder,
        _state: AgentState,
        _ctx: &mut AgentContext<'_>,
    ) {
        order.order.resize(self.0);
    }
}

/// Opens one unit for each entry signal on the default symbol. Logs only
/// phases that saw signals.
struct ScriptedLogic {
    log: Log,
}

impl AgentLogic for ScriptedLogic {
    fn entry(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision> {
        let symbol = ctx.symbol().to_string();
        let signals = ctx.decisions(&symbol).to_vec();
        if !signals.is_empty() {
            self.log.lock().unwrap().push(format!("logic:entry:{}", signals.len()));
        }

        signals
            .into_iter()
            .filter(|state| state.is_entry())
            .filter_map(|state| {
                let direction = state.order_direction()?;
                let order = ctx.create_order(&OrderRequest::market(&symbol, direction, dec!(1)));
                Some(OrderDecision::new(order, state))
            })
            .collect()
    }

    fn exit(&mut self, ctx: &mut AgentContext<'_>) -> Vec<OrderDecision> {
        let signals = ctx.decisions(ctx.symbol()).len();
        if signals > 0 {
            self.log.lock().unwrap().push(format!("logic:exit:{signals}"));
        }
        Vec::new()
    }

    fn money_management(&mut self, _order: &mut PendingOrder, _ctx: &mut AgentContext<'_>) {
        self.log.lock().unwrap().push("logic:money".to_string());
    }
}

fn agent_on(symbol: &str, log: &Log) -> TradingAgent<PaperPortfolio> {
    let config = AgentConfig::new(1, symbol, Timeframe::HOUR);
    let portfolio =
        PaperPortfolio::new(dec!(10000)).with_stream(DataStream::new("EURUSD", Timeframe::HOUR));
    TradingAgent::new(&config, portfolio, PositionBook::new(), ScriptedLogic { log: log.clone() })
}

fn agent(log: &Log) -> TradingAgent<PaperPortfolio> {
    agent_on("EURUSD", log)
}

fn running(mut agent: TradingAgent<PaperPortfolio>) -> TradingAgent<PaperPortfolio> {
    agent.initialize();
    assert!(agent.start());
    agent
}

fn bar(symbol: &str, timeframe: Timeframe, timestamp: i64) -> Bar {
    Bar::new(symbol, timeframe, timestamp, 1.10, 1.12, 1.09, 1.11)
}

fn market(agent: &mut TradingAgent<PaperPortfolio>, quantity: Decimal) -> PendingOrder {
    agent.create_order(&OrderRequest::market("EURUSD", Direction::Long, quantity))
}

const BAR: &[Hook] = &[Hook::OnBar];
const CALC: &[Hook] = &[Hook::OnCalculate];

#[test]
fn indicator_bar_handle_runs_before_entry() {
    let log = new_log();
    let mut agent = agent(&log);
    let entry = share(Recorder::new("entry", ModuleRole::Entry, BAR, &log));
    let sma = share(Recorder::new("sma", ModuleRole::Indicator, BAR, &log));
    agent.add_module(entry.clone());
    agent.add_module(sma.clone());
    let mut agent = running(agent);

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));

    assert!(position_of(&log, "sma:bar") < position_of(&log, "entry:bar"));
}

#[test]
fn gate_refuses_non_opening_order() {
    let log = new_log();
    let mut agent = agent(&log);
    let gate = share(Gate {
        name: "gate",
        allowed: false,
        stop: Some(dec!(1.0)),
        log: log.clone(),
    });
    agent.add_module(gate.clone());
    let mut agent = running(agent);

    let order = market(&mut agent, dec!(1));
    assert!(!agent.process_order(order, AgentState::NoEntry));

    assert_eq!(agent.portfolio().queue_len(), 0);
    assert!(entries(&log).is_empty());
}

#[test]
fn gate_lets_opening_states_through() {
    let log = new_log();
    let mut agent = agent(&log);
    let gate = share(Gate {
        name: "gate",
        allowed: false,
        stop: None,
        log: log.clone(),
    });
    agent.add_module(gate.clone());
    let mut agent = running(agent);

    let order = market(&mut agent, dec!(1));
    assert!(agent.process_order(order, AgentState::EntryLong));
    assert_eq!(agent.portfolio().queue_len(), 1);
}

#[test]
fn cancelled_order_is_not_queued() {
    let log = new_log();
    let mut agent = running(agent(&log));

    let mut order = market(&mut agent, dec!(1));
    let prior = order.status();
    order.cancel();

    assert_eq!(agent.submit_order(order), prior);
    assert_eq!(agent.portfolio().queue_len(), 0);
}

#[test]
fn only_first_risk_result_is_used() {
    let log = new_log();
    let mut agent = agent(&log);
    let first = share(Gate {
        name: "first",
        allowed: true,
        stop: Some(dec!(1.05)),
        log: log.clone(),
    });
    let second = share(Gate {
        name: "second",
        allowed: true,
        stop: Some(dec!(1.00)),
        log: log.clone(),
    });
    agent.add_module(first.clone());
    agent.add_module(second.clone());
    let mut agent = running(agent);

    let order = market(&mut agent, dec!(2));
    assert!(agent.process_order(order, AgentState::EntryLong));

    assert_eq!(entries(&log), vec!["first:risk", "second:risk"]);
    let comments: Vec<String> = agent
        .pending_orders()
        .iter()
        .map(|o| o.order.comment.clone())
        .collect();
    assert_eq!(comments, vec!["first".to_string(), String::new()]);
}

#[test]
fn indicators_first_regardless_of_registration_order() {
    let log = new_log();
    let mut agent = agent(&log);
    let modules = vec![
        share(Recorder::new("other", ModuleRole::Other, BAR, &log)),
        share(Recorder::new("fast", ModuleRole::Indicator, BAR, &log)),
        share(Recorder::new("stats", ModuleRole::Statistic, BAR, &log)),
        share(Recorder::new("slow", ModuleRole::Indicator, BAR, &log)),
    ];
    for module in &modules {
        agent.add_module(module.clone());
    }
    let mut agent = running(agent);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));
    agent.on_bar(&bar("EURUSD", Timeframe::DAY, 2));

    let bars: Vec<String> = entries(&log)
        .into_iter()
        .filter(|e| e.ends_with(":bar"))
        .collect();
    assert_eq!(
        bars,
        vec![
            "fast:bar", "slow:bar", "other:bar", "stats:bar", "fast:bar", "slow:bar",
            "other:bar", "stats:bar"
        ]
    );
}

#[test]
fn decisions_empty_at_each_phase_entry() {
    let log = new_log();
    let mut agent = agent(&log);
    let entry = share(Recorder::new("entry", ModuleRole::Entry, CALC, &log));
    let exit = share(Recorder::new("exit", ModuleRole::Exit, CALC, &log));
    agent.add_module(entry.clone());
    agent.add_module(exit.clone());
    let mut agent = running(agent);

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));
    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 2));

    let calls: Vec<String> = entries(&log)
        .into_iter()
        .filter(|e| e.contains(":calculate:") || e.starts_with("logic:"))
        .collect();
    assert_eq!(
        calls,
        vec![
            "entry:calculate:true",
            "logic:entry:1",
            "exit:calculate:true",
            "logic:exit:1",
            "entry:calculate:true",
            "logic:entry:1",
            "exit:calculate:true",
            "logic:exit:1",
        ]
    );
    assert_eq!(agent.pending_orders().len(), 2);
}

#[test]
fn secondary_timeframe_never_reaches_decisions() {
    let log = new_log();
    let mut agent = agent(&log);
    let sma = share(Recorder::new("sma", ModuleRole::Indicator, BAR, &log));
    let other = share(Recorder::new("other", ModuleRole::Other, BAR, &log));
    let entry = share(Recorder::new("entry", ModuleRole::Entry, CALC, &log));
    let exit = share(Recorder::new("exit", ModuleRole::Exit, CALC, &log));
    agent.add_module(sma.clone());
    agent.add_module(other.clone());
    agent.add_module(entry.clone());
    agent.add_module(exit.clone());
    let mut agent = running(agent);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("EURUSD", Timeframe::DAY, 1));

    assert_eq!(entries(&log), vec!["sma:bar", "other:bar"]);

    // the same bar on the primary timeframe does run both phases
    log.lock().unwrap().clear();
    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 2));

    let log = entries(&log);
    assert!(log.contains(&"entry:calculate:true".to_string()));
    assert!(log.contains(&"exit:calculate:true".to_string()));
}

#[test]
fn cancelled_submission_keeps_status() {
    let log = new_log();
    let mut agent = running(agent(&log));

    let queued = market(&mut agent, dec!(1));
    assert_eq!(agent.submit_order(queued), OrderStatus::Pending);
    assert_eq!(agent.portfolio().queue_len(), 1);

    let mut cancelled = market(&mut agent, dec!(1));
    cancelled.set_status(OrderStatus::Accepted);
    cancelled.cancel();
    assert_eq!(agent.submit_order(cancelled), OrderStatus::Accepted);
    assert_eq!(agent.portfolio().queue_len(), 1);
}

#[test]
fn second_initialize_is_noop() {
    let log = new_log();
    let mut agent = agent(&log);
    let module = share(Recorder::new("sma", ModuleRole::Indicator, &[Hook::OnBar, Hook::OnTick], &log));
    agent.add_module(module.clone());

    agent.initialize();
    let handles = agent.registry().len();
    let tracked: Vec<String> = agent.session().decisions.symbols().map(String::from).collect();

    agent.initialize();

    assert_eq!(agent.registry().len(), handles);
    assert_eq!(handles, 2);
    let again: Vec<String> = agent.session().decisions.symbols().map(String::from).collect();
    assert_eq!(again, tracked);
    assert_eq!(entries(&log), vec!["sma:init"]);
    assert_eq!(agent.portfolio().subscribers("EURUSD"), &[1]);
}

#[test]
fn money_management_resizes_original_order() {
    let log = new_log();
    let mut agent = agent(&log);
    let sizer = share(Sizer(dec!(5)));
    agent.add_module(sizer.clone());
    let mut agent = running(agent);

    let order = market(&mut agent, dec!(1));
    assert!(agent.process_order(order, AgentState::EntryLong));

    let pending = agent.pending_orders();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order.quantity, dec!(5));
    assert_eq!(entries(&log), vec!["logic:money"]);
}

#[test]
fn invalid_orders_are_dropped_without_stopping_pipeline() {
    let log = new_log();
    let mut agent = agent(&log);
    let gate = share(Gate {
        name: "gate",
        allowed: true,
        stop: Some(dec!(-1)),
        log: log.clone(),
    });
    agent.add_module(gate.clone());
    let mut agent = running(agent);

    let order = market(&mut agent, dec!(1));
    assert!(agent.process_order(order, AgentState::EntryLong));
    assert_eq!(agent.portfolio().queue_len(), 1);

    let empty = market(&mut agent, Decimal::ZERO);
    assert!(agent.process_order(empty, AgentState::EntryLong));
    assert_eq!(agent.portfolio().queue_len(), 1);
}

#[test]
fn events_ignored_until_running() {
    let log = new_log();
    let mut agent = agent(&log);
    let module = share(Recorder::new(
        "all",
        ModuleRole::Other,
        &[Hook::OnBar, Hook::OnOrder, Hook::OnPosition],
        &log,
    ));
    agent.add_module(module.clone());
    agent.initialize();
    log.lock().unwrap().clear();

    let order = market(&mut agent, dec!(1));
    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));
    agent.on_order(&order);
    agent.on_position(&Position::flat("EURUSD"));
    assert!(entries(&log).is_empty());

    agent.start();
    agent.on_order(&order);
    agent.on_position(&Position::flat("EURUSD"));
    assert_eq!(entries(&log), vec!["all:order", "all:position"]);
}

#[test]
fn modules_cannot_be_added_while_running() {
    let log = new_log();
    let mut agent = running(agent(&log));
    let module = share(Recorder::new("late", ModuleRole::Other, BAR, &log));

    assert!(!agent.add_module(module.clone()));
    assert!(agent.registry().is_empty());

    agent.stop();
    assert!(agent.add_module(module.clone()));
    assert!(!agent.add_module(module.clone()));
    assert_eq!(agent.registry().len(), 1);
    assert_eq!(entries(&log), vec!["late:init"]);
}

#[test]
fn deinitialize_requires_stopped_agent() {
    let log = new_log();
    let mut agent = running(agent(&log));
    assert_eq!(agent.portfolio().subscribers("EURUSD"), &[1]);

    assert_eq!(
        agent.deinitialize(),
        Err(AgentError::StillRunning { agent_id: 1 })
    );
    assert!(agent.is_running());

    agent.stop();
    assert_eq!(agent.state(), LifecycleState::Stopped);
    assert!(agent.deinitialize().is_ok());
    assert!(agent.portfolio().subscribers("EURUSD").is_empty());
}

#[test]
fn start_requires_initialize() {
    let log = new_log();
    let mut agent = agent(&log);

    assert!(!agent.start());
    assert_eq!(agent.state(), LifecycleState::Uninitialized);

    agent.initialize();
    assert!(agent.start());
    assert!(agent.started_at().is_some());
}

#[test]
fn backfill_skips_decisions_for_budgeted_bars() {
    let log = new_log();
    let mut agent = agent(&log);
    agent.set_backfill_bars(2);
    agent.set_backfill_bars(1);
    let entry = share(Recorder::new("entry", ModuleRole::Entry, &[Hook::OnBar, Hook::OnCalculate], &log));
    agent.add_module(entry.clone());
    let mut agent = running(agent);

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));
    agent.on_bar(&bar("EURUSD", Timeframe::DAY, 2));
    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 3));
    assert!(!agent.is_backfilling());
    assert!(!entries(&log).iter().any(|e| e.starts_with("logic:")));

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 4));

    let log = entries(&log);
    assert!(log.contains(&"entry:backfill:1".to_string()));
    assert!(log.contains(&"entry:backfill:2".to_string()));
    assert!(log.contains(&"entry:backfill:3".to_string()));
    assert!(!log.contains(&"entry:backfill:4".to_string()));
    assert!(log.contains(&"logic:entry:1".to_string()));
}

#[test]
fn backfill_period_converts_to_bars() {
    let log = new_log();
    let mut agent = agent(&log);
    agent.set_backfill_period(chrono::Duration::hours(5));
    assert_eq!(agent.backfill_remaining(), 5);
}

#[test]
fn configured_backfill_period_beyond_duration_range() {
    let log = new_log();
    let mut config = AgentConfig::new(1, "EURUSD", Timeframe::HOUR);
    config.backfill_period_secs = Some(100_000_000_000_000_000);
    let portfolio = PaperPortfolio::new(dec!(10000));
    let agent = TradingAgent::new(&config, portfolio, PositionBook::new(), ScriptedLogic { log });

    assert_eq!(agent.backfill_remaining(), 27_777_777_777_778);
    assert!(agent.is_backfilling());
}

#[test]
fn stream_and_interval_routing() {
    let log = new_log();
    let mut agent = agent(&log);
    agent.add_data_stream(DataStream::new("GBPUSD", Timeframe::HOUR));
    let cable = share(Recorder::new("cable", ModuleRole::Indicator, BAR, &log).following("GBPUSD"));
    let daily = share(Recorder::new("daily", ModuleRole::Other, BAR, &log).on_interval(Timeframe::DAY));
    agent.add_module(cable.clone());
    agent.add_module(daily.clone());
    let mut agent = running(agent);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));
    assert!(entries(&log).is_empty());

    agent.on_bar(&bar("GBPUSD", Timeframe::HOUR, 2));
    agent.on_bar(&bar("EURUSD", Timeframe::DAY, 3));
    assert_eq!(entries(&log), vec!["cable:bar", "daily:bar"]);
}

#[test]
fn unresolved_stream_still_reaches_undeclared_indicators() {
    let log = new_log();
    let mut agent = agent_on("USDJPY", &log);
    let any = share(Recorder::new("any", ModuleRole::Indicator, BAR, &log));
    let euro = share(Recorder::new("euro", ModuleRole::Indicator, BAR, &log).following("EURUSD"));
    let entry = share(Recorder::new("entry", ModuleRole::Entry, CALC, &log));
    agent.add_module(any.clone());
    agent.add_module(euro.clone());
    agent.add_module(entry.clone());
    let mut agent = running(agent);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("USDJPY", Timeframe::HOUR, 1));

    let log = entries(&log);
    assert_eq!(log[0], "any:bar");
    assert!(!log.contains(&"euro:bar".to_string()));
    assert!(log.contains(&"logic:entry:1".to_string()));
}

#[test]
fn malformed_and_unknown_bars_are_dropped() {
    let log = new_log();
    let mut agent = agent(&log);
    let sma = share(Recorder::new("sma", ModuleRole::Indicator, BAR, &log));
    agent.add_module(sma.clone());
    let mut agent = running(agent);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("", Timeframe::HOUR, 1));
    agent.on_bar(&bar("XAUUSD", Timeframe::HOUR, 2));
    assert!(entries(&log).is_empty());

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 3));
    assert_eq!(entries(&log), vec!["sma:bar"]);
    assert_eq!(agent.context().current_bar("EURUSD").map(|b| b.timestamp), Some(3));
}

#[test]
fn dropped_module_is_skipped() {
    let log = new_log();
    let mut agent = agent(&log);
    let gone = share(Recorder::new("gone", ModuleRole::Indicator, BAR, &log));
    let kept = share(Recorder::new("kept", ModuleRole::Other, BAR, &log));
    agent.add_module(gone.clone());
    agent.add_module(kept.clone());
    let mut agent = running(agent);
    drop(gone);
    log.lock().unwrap().clear();

    agent.on_bar(&bar("EURUSD", Timeframe::HOUR, 1));

    assert_eq!(entries(&log), vec!["kept:bar"]);
    assert_eq!(agent.modules().len(), 1);
}

#[test]
fn fills_update_positions_even_when_stopped() {
    let log = new_log();
    let mut agent = agent(&log);
    let stats = share(Recorder::new("stats", ModuleRole::Statistic, &[Hook::OnFill], &log));
    agent.add_module(stats.clone());
    agent.initialize();
    log.lock().unwrap().clear();

    let order = market(&mut agent, dec!(2));
    let trade = Trade::fill(&order, dec!(2), dec!(1.10));
    agent.on_fill(&trade, &order);
    assert!(agent.positions().position("EURUSD").is_long());
    assert!(entries(&log).is_empty());

    agent.start();
    agent.on_fill(&trade, &order);
    assert_eq!(entries(&log), vec!["stats:fill"]);
    assert_eq!(agent.positions().position("EURUSD").quantity, dec!(4));

    let charts = agent.drain_chart_updates();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0].name, "fills");
    assert!(agent.drain_chart_updates().is_empty());
    assert_eq!(agent.statistics().len(), 1);
}

#[test]
fn ticks_recorded_once_initialized() {
    let log = new_log();
    let mut agent = agent(&log);
    let module = share(Recorder::new("quotes", ModuleRole::Other, &[Hook::OnTick], &log));
    agent.add_module(module.clone());

    let tick = Tick::quote("EURUSD", 1, 1.1000, 1.1002);
    agent.on_tick(&tick);
    assert!(agent.session().current_ticks.is_empty());

    agent.initialize();
    agent.on_tick(&tick);
    assert!(agent.session().current_ticks.contains_key("EURUSD"));
    assert!(entries(&log).iter().all(|e| e != "quotes:tick"));

    agent.start();
    agent.on_tick(&tick);
    assert!(entries(&log).contains(&"quotes:tick".to_string()));
}

#[test]
fn flatten_closes_open_positions() {
    let log = new_log();
    let mut agent = running(agent(&log));

    let order = agent.create_order(&OrderRequest::market("EURUSD", Direction::Short, dec!(3)));
    let trade = Trade::fill(&order, dec!(3), dec!(1.10));
    agent.on_fill(&trade, &order);

    assert_eq!(agent.flatten(), 1);
    let pending = agent.pending_orders();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].order.direction, Direction::Long);
    assert_eq!(pending[0].order.quantity, dec!(3));
}

#[test]
fn pending_orders_are_per_agent() {
    let log = new_log();
    let mut agent = running(agent(&log));

    let ours = market(&mut agent, dec!(1));
    agent.submit_order(ours);
    let theirs = agent
        .portfolio_mut()
        .create_order(&OrderRequest::market("EURUSD", Direction::Long, dec!(1)), 9);
    agent.portfolio_mut().queue_order(theirs);

    assert_eq!(agent.portfolio().queue_len(), 2);
    assert_eq!(agent.pending_orders().len(), 1);
}

#[tokio::test]
async fn runner_applies_events_in_order() {
    let log = new_log();
    let mut agent = agent(&log);
    let entry = share(Recorder::new("entry", ModuleRole::Entry, CALC, &log));
    agent.add_module(entry.clone());
    agent.initialize();

    let (runner, tx) = AgentRunner::new(agent, 8);
    let handle = tokio::spawn(runner.run());

    tx.send(AgentEvent::Bar(bar("EURUSD", Timeframe::HOUR, 1))).await.unwrap();
    tx.send(AgentEvent::Start).await.unwrap();
    tx.send(AgentEvent::Bar(bar("EURUSD", Timeframe::HOUR, 2))).await.unwrap();
    tx.send(AgentEvent::Stop).await.unwrap();
    drop(tx);

    let agent = handle.await.unwrap();
    assert!(!agent.is_running());
    assert_eq!(agent.pending_orders().len(), 1);
    assert_eq!(
        entries(&log)
            .iter()
            .filter(|e| e.starts_with("logic:entry"))
            .count(),
        1
    );
}
