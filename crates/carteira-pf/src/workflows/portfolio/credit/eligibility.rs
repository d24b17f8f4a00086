use super::super::domain::{ClientRecord, FarolResult};

/// Credit-offer gate. Any unknown operand closes the gate.
pub(crate) fn is_credit_eligible(client: &ClientRecord, farol: &FarolResult) -> bool {
    farol.is_encarteiravel()
        && !client.has_restrictive
        && !client.is_in_loss
        && client.max_delay_days.is_some_and(|days| days < 60.0)
        && client
            .months_since_income_update
            .is_some_and(|months| months <= 48.0)
        && client
            .months_since_movement
            .is_some_and(|months| months <= 6.0)
        && client.has_valid_contact
}
