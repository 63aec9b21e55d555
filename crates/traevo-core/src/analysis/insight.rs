//! Insight composer
//!
//! Renders the risk tier and the projected amount into the user-facing
//! message shown on the dashboard. The copy follows the product's
//! "anti-anxiety" voice: encouraging and practical, in Portuguese.

use rust_decimal::Decimal;

use super::types::{RiskTier, Trend};

/// Extra clause appended when spending has been rising
const RISING_TREND_CLAUSE: &str = " Seus gastos têm aumentado nos últimos meses.";

/// Compose the insight message for a prediction
///
/// Each tier has a pool of three candidate templates, but only the first is
/// ever selected; the pools are kept for a message-rotation feature that was
/// never finished. When the trend is rising and the tier is not low, a
/// trend-warning clause is appended. Deterministic: no randomness, no I/O.
pub fn compose_insight(tier: RiskTier, projected: Decimal, trend: Trend) -> String {
    let pool = template_pool(tier, projected);
    let [mut message, _, _] = pool;

    if trend == Trend::Rising && tier != RiskTier::Low {
        message.push_str(RISING_TREND_CLAUSE);
    }

    message
}

/// Candidate messages per tier, with the projected amount already embedded
fn template_pool(tier: RiskTier, projected: Decimal) -> [String; 3] {
    match tier {
        RiskTier::Low => [
            format!(
                "Ótimo trabalho! Seu gasto projetado é de R$ {:.2}. Você está no controle!",
                projected
            ),
            "Parabéns! Suas finanças estão saudáveis. Continue assim! 💚".to_string(),
            format!(
                "Você está indo muito bem! Gasto projetado: R$ {:.2}. Mantenha o ritmo!",
                projected
            ),
        ],
        RiskTier::Medium => [
            format!(
                "Atenção: Gasto projetado de R$ {:.2}. Considere revisar gastos não essenciais.",
                projected
            ),
            "Seus gastos estão aumentando. Que tal revisar algumas categorias? 💛".to_string(),
            format!(
                "Você está no limite! Gasto projetado: R$ {:.2}. Planeje os próximos dias com cuidado.",
                projected
            ),
        ],
        RiskTier::High => [
            format!(
                "Alerta! Gasto projetado de R$ {:.2} pode exceder seu orçamento. Priorize o essencial! 🚨",
                projected
            ),
            "Cuidado! Você está próximo do limite. Evite gastos não essenciais nos próximos dias."
                .to_string(),
            "Seus gastos estão acima do planejado. Vamos ajustar juntos? Revise suas prioridades. ❤️"
                .to_string(),
        ],
    }
}
