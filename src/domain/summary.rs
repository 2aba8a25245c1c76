//! Label distribution summary.
//!
//! Directional rows (`label != Neutral`) are the ones the downstream trading
//! stage acts on; the win rate, return statistics and drawdown are taken over
//! those rows in timestamp order.

use crate::domain::label::{Label, LabelRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSummary {
    pub total: usize,
    pub undefined: usize,
    pub oversold: usize,
    pub neutral: usize,
    pub overbought: usize,
    pub win_rate: f64,
    pub mean_directional_return: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    /// Mean magnitude of the losing returns.
    pub avg_loss: f64,
    /// Largest peak-to-trough fall of the compounded directional returns.
    pub max_drawdown: f64,
    pub expected_value: f64,
}

impl LabelSummary {
    pub fn compute(records: &[LabelRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            undefined: 0,
            oversold: 0,
            neutral: 0,
            overbought: 0,
            win_rate: 0.0,
            mean_directional_return: 0.0,
            profit_factor: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            max_drawdown: 0.0,
            expected_value: 0.0,
        };

        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut return_sum = 0.0_f64;
        let mut returns = Vec::new();

        for record in records {
            let Some(outcome) = record.outcome else {
                summary.undefined += 1;
                continue;
            };
            match outcome.label {
                Label::Oversold => summary.oversold += 1,
                Label::Neutral => {
                    summary.neutral += 1;
                    continue;
                }
                Label::Overbought => summary.overbought += 1,
            }
            let r = outcome.realized_return;
            if r > 0.0 {
                wins += 1;
                total_wins += r;
            } else if r < 0.0 {
                losses += 1;
                total_losses += r.abs();
            }
            return_sum += r;
            returns.push(r);
        }

        let directional = summary.directional();
        if directional == 0 {
            return summary;
        }

        summary.win_rate = wins as f64 / directional as f64;
        summary.mean_directional_return = return_sum / directional as f64;
        summary.profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        if wins > 0 {
            summary.avg_win = total_wins / wins as f64;
        }
        if losses > 0 {
            summary.avg_loss = total_losses / losses as f64;
        }
        summary.max_drawdown = compute_drawdown(&returns);
        summary.expected_value =
            summary.win_rate * summary.avg_win - (1.0 - summary.win_rate) * summary.avg_loss;
        summary
    }

    pub fn defined(&self) -> usize {
        self.total - self.undefined
    }

    pub fn directional(&self) -> usize {
        self.oversold + self.overbought
    }
}

/// Equity starts at 1.0 and compounds each return.
fn compute_drawdown(returns: &[f64]) -> f64 {
    let mut equity = 1.0_f64;
    let mut peak = equity;
    let mut max_dd = 0.0_f64;

    for r in returns {
        equity *= 1.0 + r;
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
