//! Terminal rendering of an estimate.

use std::io::{self, Write};

use crate::estimator::{Estimate, MapEstimate};

use super::flips::{write_sequence, SequenceLayout};

/// Format a probability level such as 0.95 as "95%".
pub fn percent_label(level: f64) -> String {
    let pct = level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}%", pct)
    } else {
        let text = format!("{:.2}", pct);
        format!("{}%", text.trim_end_matches('0').trim_end_matches('.'))
    }
}

/// Full human report: flip sequence, counts, plain-English and technical blocks.
pub fn write_human<W: Write>(out: &mut W, estimate: &Estimate, layout: &SequenceLayout) -> io::Result<()> {
    if !estimate.flips.is_empty() {
        write_sequence(out, &estimate.flips, layout)?;
    }

    let summary = &estimate.summary;
    let tally = estimate.tally;

    writeln!(out, "=== Coin Bias Estimate ===")?;
    writeln!(out, "Flips:  {}", tally.trials())?;
    writeln!(out, "Heads:  {}", tally.heads)?;
    writeln!(out, "Tails:  {}", tally.tails)?;
    writeln!(out)?;

    let range_label = format!("{} uncertainty range:", percent_label(summary.interval.level));
    writeln!(out, "Plain English:")?;
    writeln!(
        out,
        "- Best estimate of P(Heads): {:.3}  (~{:.1}%)",
        summary.mean,
        summary.mean * 100.0
    )?;
    writeln!(
        out,
        "- {:<27}{:.3} to {:.3}",
        range_label, summary.interval.low, summary.interval.high
    )?;
    writeln!(
        out,
        "- Chance coin favors heads:  {:.3}   (P(Heads) > 0.5)",
        summary.tail_prob
    )?;
    if let Some(band) = summary.fair_band {
        writeln!(
            out,
            "- Chance roughly fair:       {:.3}   (within ±{} of 0.5)",
            band.probability, band.eps
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Technical:")?;
    writeln!(out, "- Prior {} → Posterior {}", estimate.prior, estimate.posterior)?;
    match &summary.map {
        MapEstimate::Defined { value } => writeln!(out, "- Posterior MAP: {:.3}", value)?,
        MapEstimate::Undefined { reason } => {
            writeln!(out, "- Posterior MAP: undefined ({reason})")?
        }
    }
    writeln!(out, "- Posterior std dev: {:.3}", summary.std_dev)?;
    if let Some(mc) = &estimate.monte_carlo {
        writeln!(
            out,
            "- Monte Carlo ({} draws): range {:.3} to {:.3}, P(Heads) > 0.5 {:.3}, roughly fair {:.3}",
            mc.samples, mc.interval_low, mc.interval_high, mc.tail_prob, mc.fair_band_prob
        )?;
    }
    if let Some(p) = estimate.true_p {
        writeln!(out, "- True P(Heads) (simulation only): {}", p)?;
    }
    match estimate.seed {
        Some(seed) => writeln!(out, "- Seed: {seed}")?,
        None => writeln!(out, "- Seed: (none)")?,
    }
    Ok(())
}

/// One-line digest for `--format summary`.
pub fn summary_line(estimate: &Estimate) -> String {
    let s = &estimate.summary;
    let map = match s.map.value() {
        Some(v) => format!("{v:.3}"),
        None => "undefined".to_string(),
    };
    format!(
        "heads={} tails={} mean={:.3} map={} ci{}=[{:.3},{:.3}] p_gt_half={:.3}",
        estimate.tally.heads,
        estimate.tally.tails,
        s.mean,
        map,
        percent_label(s.interval.level).trim_end_matches('%'),
        s.interval.low,
        s.interval.high,
        s.tail_prob
    )
}
