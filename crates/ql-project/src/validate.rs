//! Study validation logic.
//!
//! Catches malformed inputs before anything is solved. Load-dependent
//! failures (an unstable station) are left to the solvers.

use crate::schema::{
    AnalysisDef, AxisDef, CapacityGridDef, IntRangeDef, RepairDef, STUDY_VERSION,
    SingleServerGridDef, Study,
};

/// Decimal places an `f64` can still carry; the solvers refuse more.
const MAX_PRECISION: u32 = 15;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Empty axis: {field}")]
    EmptyAxis { field: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version != STUDY_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }

    for (idx, analysis) in study.analyses.iter().enumerate() {
        let ctx = format!("analyses[{}].{}", idx, analysis.kind());
        validate_analysis(analysis, &ctx)?;
    }
    Ok(())
}

fn validate_analysis(analysis: &AnalysisDef, ctx: &str) -> Result<(), ValidationError> {
    match analysis {
        AnalysisDef::Repair(def) => validate_repair(def, ctx),
        AnalysisDef::SingleServer(def) => {
            positive(def.arrival, ctx, "arrival")?;
            positive(def.service, ctx, "service")?;
            positive(def.shift_hours, ctx, "shift_hours")?;
            non_negative(def.price_per_client, ctx, "price_per_client")?;
            fraction(def.net_share, ctx, "net_share")?;
            at_least_one(def.masters, ctx, "masters")
        }
        AnalysisDef::Channels(def) => {
            positive(def.arrival, ctx, "arrival")?;
            positive(def.service, ctx, "service")?;
            at_least_one(def.max_channels, ctx, "max_channels")
        }
        AnalysisDef::Priority(def) => {
            positive(def.arrival_priority, ctx, "arrival_priority")?;
            positive(def.arrival_regular, ctx, "arrival_regular")?;
            positive(def.service_time_priority, ctx, "service_time_priority")?;
            positive(def.service_time_regular, ctx, "service_time_regular")
        }
        AnalysisDef::TwoPhase(def) => {
            positive(def.arrival, ctx, "arrival")?;
            positive(def.prep_time, ctx, "prep_time")?;
            positive(def.service_time, ctx, "service_time")?;
            at_least_one(def.channels, ctx, "channels")
        }
        AnalysisDef::CapacityGrid(def) => validate_capacity_grid(def, ctx),
        AnalysisDef::SingleServerGrid(def) => validate_single_server_grid(def, ctx),
    }
}

fn validate_repair(def: &RepairDef, ctx: &str) -> Result<(), ValidationError> {
    if def.precision > MAX_PRECISION {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.precision", ctx),
            value: def.precision.to_string(),
            reason: format!("must be at most {} decimals", MAX_PRECISION),
        });
    }
    for (key, rate) in &def.rates {
        non_negative(*rate, ctx, &format!("rates.{}", key))?;
    }
    for key in &def.scenario.scaled {
        if !def.rates.contains_key(key) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.scenario.scaled", ctx),
                value: key.clone(),
                reason: "not one of the listed rates".to_string(),
            });
        }
    }
    positive(def.scenario.rate_factor, ctx, "scenario.rate_factor")?;
    non_negative(def.scenario.cost_multiplier, ctx, "scenario.cost_multiplier")?;
    for (i, v) in def.incomes.iter().chain(&def.repair_costs).enumerate() {
        if !v.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.economics[{}]", ctx, i),
                value: v.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_capacity_grid(def: &CapacityGridDef, ctx: &str) -> Result<(), ValidationError> {
    positive(def.arrival_per_minute, ctx, "arrival_per_minute")?;
    at_least_one(def.channels, ctx, "channels")?;
    int_range(&def.capacities, ctx, "capacities")?;
    axis(&def.service_time_s, ctx, "service_time_s")?;
    positive(def.service_time_s.start, ctx, "service_time_s.start")?;
    positive(def.service_time_s.end, ctx, "service_time_s.end")
}

fn validate_single_server_grid(
    def: &SingleServerGridDef,
    ctx: &str,
) -> Result<(), ValidationError> {
    axis(&def.arrival, ctx, "arrival")?;
    axis(&def.service, ctx, "service")?;
    positive(def.arrival.start.min(def.arrival.end), ctx, "arrival.start")?;
    positive(def.service.start.min(def.service.end), ctx, "service.start")
}

fn positive(value: f64, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("{}.{}", ctx, field),
        value: value.to_string(),
        reason: "must be positive and finite".to_string(),
    })
}

fn non_negative(value: f64, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("{}.{}", ctx, field),
        value: value.to_string(),
        reason: "must be non-negative and finite".to_string(),
    })
}

fn fraction(value: f64, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("{}.{}", ctx, field),
        value: value.to_string(),
        reason: "must be within [0, 1]".to_string(),
    })
}

fn at_least_one(value: usize, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if value >= 1 {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: format!("{}.{}", ctx, field),
        value: value.to_string(),
        reason: "must be at least 1".to_string(),
    })
}

fn axis(def: &AxisDef, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if def.points == 0 {
        return Err(ValidationError::EmptyAxis {
            field: format!("{}.{}", ctx, field),
        });
    }
    if !def.start.is_finite() || !def.end.is_finite() {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.{}", ctx, field),
            value: format!("{}..{}", def.start, def.end),
            reason: "bounds must be finite".to_string(),
        });
    }
    Ok(())
}

fn int_range(def: &IntRangeDef, ctx: &str, field: &str) -> Result<(), ValidationError> {
    if def.start > def.end {
        return Err(ValidationError::EmptyAxis {
            field: format!("{}.{}", ctx, field),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn study_with(analysis: AnalysisDef) -> Study {
        Study {
            version: 1,
            name: "t".to_string(),
            analyses: vec![analysis],
        }
    }

    #[test]
    fn default_study_is_valid() {
        validate_study(&Study::default()).unwrap();
    }

    #[test]
    fn zero_channels_rejected() {
        let study = study_with(AnalysisDef::TwoPhase(TwoPhaseDef {
            channels: 0,
            ..TwoPhaseDef::default()
        }));
        let err = validate_study(&study).unwrap_err();
        assert!(err.to_string().contains("analyses[0].two_phase.channels"));
    }

    #[test]
    fn non_positive_rates_rejected() {
        let study = study_with(AnalysisDef::Channels(ChannelsDef {
            service: 0.0,
            ..ChannelsDef::default()
        }));
        assert!(validate_study(&study).is_err());

        let study = study_with(AnalysisDef::Priority(PriorityDef {
            service_time_regular: f64::NAN,
            ..PriorityDef::default()
        }));
        assert!(validate_study(&study).is_err());
    }

    #[test]
    fn negative_transition_rate_rejected() {
        let mut def = RepairDef::default();
        def.rates.insert("lambda_13".to_string(), -1.0);
        let err = validate_study(&study_with(AnalysisDef::Repair(def))).unwrap_err();
        assert!(err.to_string().contains("rates.lambda_13"));
    }

    #[test]
    fn oversized_precision_rejected() {
        let def = RepairDef {
            precision: 400,
            ..RepairDef::default()
        };
        let err = validate_study(&study_with(AnalysisDef::Repair(def))).unwrap_err();
        assert!(err.to_string().contains("analyses[0].repair.precision"));

        let def = RepairDef {
            precision: MAX_PRECISION,
            ..RepairDef::default()
        };
        validate_study(&study_with(AnalysisDef::Repair(def))).unwrap();
    }

    #[test]
    fn unknown_version_rejected() {
        let study = Study {
            version: STUDY_VERSION + 1,
            ..Study::default()
        };
        assert!(matches!(
            validate_study(&study),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn unknown_scenario_rate_rejected() {
        let mut def = RepairDef::default();
        def.scenario.scaled = vec!["lambda_99".to_string()];
        assert!(validate_study(&study_with(AnalysisDef::Repair(def))).is_err());
    }

    #[test]
    fn empty_axes_rejected() {
        let study = study_with(AnalysisDef::CapacityGrid(CapacityGridDef {
            capacities: IntRangeDef { start: 5, end: 4 },
            ..CapacityGridDef::default()
        }));
        assert!(matches!(
            validate_study(&study),
            Err(ValidationError::EmptyAxis { .. })
        ));

        let mut def = SingleServerGridDef::default();
        def.service.points = 0;
        assert!(matches!(
            validate_study(&study_with(AnalysisDef::SingleServerGrid(def))),
            Err(ValidationError::EmptyAxis { .. })
        ));
    }

    #[test]
    fn future_version_rejected() {
        let study = Study {
            version: 99,
            ..Study::default()
        };
        assert!(matches!(
            validate_study(&study),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }
}
