//! Built-in checklists shipped with the binary.

use std::collections::HashMap;

use crate::graph::{
    AnswerOption, ExecutionPlan, GraphDefinition, OutcomeNode, QuestionNode, Verdict,
};

/// Name of the default checklist.
pub const TREND_PULLBACK: &str = "trend-pullback";

/// Names accepted by [`super::builtin`].
pub const BUILTIN_NAMES: &[&str] = &[TREND_PULLBACK];

fn question(id: &str, category: &str, prompt: &str, detail: &str) -> QuestionNode {
    QuestionNode {
        id: id.to_string(),
        category: category.to_string(),
        prompt: prompt.to_string(),
        detail: Some(detail.to_string()),
        options: Vec::new(),
    }
}

trait WithOption {
    fn with_option(self, label: &str, value: &str, target: &str) -> Self;
}

impl WithOption for QuestionNode {
    fn with_option(mut self, label: &str, value: &str, target: &str) -> Self {
        self.options.push(AnswerOption {
            label: label.to_string(),
            value: value.to_string(),
            target: Some(target.to_string()),
            icon: None,
        });
        self
    }
}

fn outcome(id: &str, verdict: Verdict, title: &str, message: &str, suggestions: &[&str]) -> OutcomeNode {
    OutcomeNode {
        id: id.to_string(),
        verdict,
        title: title.to_string(),
        message: message.to_string(),
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        execution_plan: None,
    }
}

/// Pre-trade checklist for trend and pullback entries.
///
/// Sections, in order:
/// 1. Direction and pre-trade context (open positions, preparation)
/// 2. Trend and structure
/// 3. Entry (key level, confluence, signal)
/// 4. Risk (stop, reward-to-risk)
/// 5. Psychology and final confirmation
pub fn trend_pullback_checklist() -> GraphDefinition {
    let questions = vec![
        question(
            "trade_direction",
            "Direction",
            "Which direction are you planning to trade?",
            "Every other answer is judged against this direction.",
        )
        .with_option("Long", "long", "pre_trade_context")
        .with_option("Short", "short", "pre_trade_context"),
        question(
            "pre_trade_context",
            "Pre-trade",
            "Could an existing position conflict with this trade?",
            "Options, hedges or correlated positions change the real exposure.",
        )
        .with_option("No conflict", "no_conflict", "daily_prep")
        .with_option("Related position open", "has_position", "context_conflict"),
        question(
            "context_conflict",
            "Pre-trade",
            "Is the combined exposure still under control?",
            "Check direction, instrument and size against what is already open.",
        )
        .with_option("Controlled", "acceptable", "daily_prep")
        .with_option("Exposure stacks too high", "too_risky", "result_no_go_context"),
        question(
            "daily_prep",
            "Pre-trade",
            "Is today's pre-market analysis done?",
            "Multi-timeframe trend, key levels and scheduled news.",
        )
        .with_option("Done, plan is clear", "done", "htf_trend")
        .with_option("Partly done", "partial", "result_caution_prep")
        .with_option("Not done", "no", "result_no_go_prep"),
        question(
            "htf_trend",
            "Trend & structure",
            "Does the higher-timeframe trend agree with your direction?",
            "Weekly, daily and 4H from the top down.",
        )
        .with_option("Agrees", "yes", "market_structure")
        .with_option("Counter-trend", "no", "counter_trend_confirm"),
        question(
            "counter_trend_confirm",
            "Trend & structure",
            "Is there a clear reversal signal?",
            "A higher-timeframe change of character, failed breakout or strong reversal bar.",
        )
        .with_option("Clear reversal", "yes", "market_structure")
        .with_option("Not convincing", "no", "result_no_go_trend"),
        question(
            "market_structure",
            "Trend & structure",
            "Is the market structure readable?",
            "Clean swing highs and lows, identifiable breaks of structure.",
        )
        .with_option("Readable", "yes", "key_level")
        .with_option("Choppy", "no", "result_no_go_structure"),
        question(
            "key_level",
            "Entry",
            "Is price at a key level?",
            "Support/resistance, supply/demand zone or a measured-move target.",
        )
        .with_option("At the level", "yes", "entry_signal")
        .with_option("Close, needs confluence", "maybe", "confluence_check")
        .with_option("Far from any level", "no", "result_caution_level"),
        question(
            "confluence_check",
            "Entry",
            "Are there at least two confluence factors?",
            "Moving average, trend line, round number, prior swing.",
        )
        .with_option("Two or more", "yes", "entry_signal")
        .with_option("Not enough", "no", "result_caution_level"),
        question(
            "entry_signal",
            "Entry",
            "Has the entry signal triggered?",
            "Signal bar closed in your direction with follow-through.",
        )
        .with_option("Triggered", "yes", "stop_loss")
        .with_option("Still waiting", "waiting", "result_caution_signal")
        .with_option("No signal", "no", "result_no_go_signal"),
        question(
            "stop_loss",
            "Risk",
            "Is the stop placed where the setup is invalidated?",
            "A stop you cannot explain is a stop you will move.",
        )
        .with_option("Defined and justified", "yes", "risk_reward")
        .with_option("Not sure where", "no", "result_no_go_stoploss"),
        question(
            "risk_reward",
            "Risk",
            "What is the reward-to-risk ratio to the first target?",
            "Measured from entry to stop and entry to target.",
        )
        .with_option("3:1 or better", "3+", "emotional_check")
        .with_option("2:1 to 3:1", "2-3", "emotional_check")
        .with_option("1:1 to 2:1", "1-2", "result_caution_rr")
        .with_option("Below 1:1", "<1", "result_no_go_rr"),
        question(
            "emotional_check",
            "Psychology",
            "How do you feel about taking this trade?",
            "Be honest; the order is not placed yet.",
        )
        .with_option("Calm, following the plan", "calm", "final_confirm")
        .with_option("Impatient, afraid to miss it", "fomo", "result_caution_emotion")
        .with_option("Want to win back a loss", "revenge", "result_no_go_emotion"),
        question(
            "final_confirm",
            "Psychology",
            "Does this trade match your written trading plan?",
            "Setup, size and management as written, no exceptions.",
        )
        .with_option("Exactly", "yes", "result_go")
        .with_option("Small deviations", "partial", "result_caution_plan")
        .with_option("Not sure", "no", "result_no_go_plan"),
    ];

    let mut go = outcome(
        "result_go",
        Verdict::Go,
        "Clear to trade",
        "Every check passed. Execute the plan as written.",
        &[],
    );
    go.execution_plan = Some(ExecutionPlan {
        entry: "Stop order one tick beyond the signal bar".to_string(),
        stop_loss: "One tick beyond the invalidation point".to_string(),
        take_profit: "Scale out at the measured move, trail the rest".to_string(),
        notes: Some("Do not widen the stop after entry.".to_string()),
    });

    let outcomes = vec![
        go,
        outcome(
            "result_caution_prep",
            Verdict::Caution,
            "Finish your preparation",
            "The trade may be fine, but you have not done the work to know.",
            &["Complete the top-down analysis", "Trade reduced size if you must"],
        ),
        outcome(
            "result_caution_level",
            Verdict::Caution,
            "Location is weak",
            "Entries away from key levels have a poor edge.",
            &["Wait for price to reach the level", "Set an alert instead of an order"],
        ),
        outcome(
            "result_caution_signal",
            Verdict::Caution,
            "Wait for the signal",
            "Anticipating entries turns a setup into a guess.",
            &["Place the order only after the signal bar closes"],
        ),
        outcome(
            "result_caution_rr",
            Verdict::Caution,
            "Reward does not justify the risk",
            "A low ratio needs a high win rate you may not have.",
            &["Look for a tighter stop or a better entry", "Skip if the ratio cannot improve"],
        ),
        outcome(
            "result_caution_emotion",
            Verdict::Caution,
            "Slow down",
            "Fear of missing out leads to chasing.",
            &["Step away for five minutes", "Re-read the plan before entering"],
        ),
        outcome(
            "result_caution_plan",
            Verdict::Caution,
            "Deviation from the plan",
            "Small exceptions add up to a different system.",
            &["Write down the deviation and its reason", "Use minimum size"],
        ),
        outcome(
            "result_no_go_context",
            Verdict::NoGo,
            "Exposure too high",
            "Combined with open positions this trade over-concentrates risk.",
            &["Reduce or close the related position first"],
        ),
        outcome(
            "result_no_go_prep",
            Verdict::NoGo,
            "No preparation, no trade",
            "Trading without analysis is gambling.",
            &["Do the pre-market routine before the next session"],
        ),
        outcome(
            "result_no_go_trend",
            Verdict::NoGo,
            "Counter-trend without confirmation",
            "Fading a trend needs a clear reversal.",
            &["Wait for a change of character on the higher timeframe"],
        ),
        outcome(
            "result_no_go_structure",
            Verdict::NoGo,
            "Structure is unreadable",
            "Choppy markets punish directional trades.",
            &["Stand aside until swings are clean"],
        ),
        outcome(
            "result_no_go_signal",
            Verdict::NoGo,
            "No entry signal",
            "There is nothing to trade yet.",
            &["Keep watching, do not pre-empt"],
        ),
        outcome(
            "result_no_go_stoploss",
            Verdict::NoGo,
            "Stop is undefined",
            "Without an invalidation point the risk is unknown.",
            &["Define the stop before sizing the trade"],
        ),
        outcome(
            "result_no_go_rr",
            Verdict::NoGo,
            "Negative reward-to-risk",
            "Risking more than the target pays is a losing proposition.",
            &["Skip this trade"],
        ),
        outcome(
            "result_no_go_emotion",
            Verdict::NoGo,
            "Revenge trading",
            "Trying to win back a loss is the fastest way to a bigger one.",
            &["Stop trading for the day", "Review the losing trade instead"],
        ),
        outcome(
            "result_no_go_plan",
            Verdict::NoGo,
            "Trade is off-plan",
            "If you cannot say it matches the plan, it does not.",
            &["Re-read the plan", "Paper trade this setup first"],
        ),
    ];

    GraphDefinition {
        name: "Trend pullback checklist".to_string(),
        description: "Pre-trade checks covering context, trend, entry, risk and psychology"
            .to_string(),
        root_id: "trade_direction".to_string(),
        questions: questions
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect::<HashMap<_, _>>(),
        outcomes: outcomes
            .into_iter()
            .map(|o| (o.id.clone(), o))
            .collect::<HashMap<_, _>>(),
    }
}
