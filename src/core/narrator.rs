use crate::domain::model::{YearEffect, YearPair};

/// 顯著性分級表：由上往下掃描，p 嚴格大於界線者取得該標籤
///
/// The empty label marks conventional significance; it splices into the
/// sentence after "was" and the wording still reads correctly.
const SIGNIFICANCE_BANDS: &[(f64, &str)] = &[
    (0.1, "not"),
    (0.05, "marginally"),
    (0.01, ""),
    (0.001, "very"),
];

/// 低於所有界線時的最高等級
const STRONGEST_SIGNIFICANCE: &str = "highly";

pub fn significance_label(p_value: f64) -> &'static str {
    for &(bound, label) in SIGNIFICANCE_BANDS {
        if p_value > bound {
            return label;
        }
    }
    STRONGEST_SIGNIFICANCE
}

pub fn direction_label(t_value: f64) -> &'static str {
    if t_value > 0.0 {
        // is_year1 為正代表較早年份的極化較高，因此後來的年份是下降
        "decreased"
    } else if t_value < 0.0 {
        "increased"
    } else {
        "unchanged"
    }
}

/// 把模型的兩個純量翻譯成一句英文結論，無 I/O、無狀態
pub fn narrate(effect: YearEffect, years: YearPair) -> String {
    format!(
        "This regression finds that the difference in polarization was {} significant,\nwith {} polarization in {} compared to {}.",
        significance_label(effect.p_value),
        direction_label(effect.t_value),
        years.year2,
        years.year1
    )
}
