// src/common/i18n.rs

// Mensagens de erro por idioma, indexadas pelo código estável do AppError.
// (código, pt, en)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("VALIDATION_ERROR", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("INVALID_PAYLOAD", "O corpo da requisição não é um JSON válido.", "The request body is not valid JSON."),
    ("INVALID_QUANTITY", "A quantidade não pode ser negativa.", "Quantity cannot be negative."),
    ("TOO_MANY_SKU_CODES", "No máximo 100 códigos de SKU por consulta.", "At most 100 SKU codes per query."),
    ("SKU_NOT_FOUND", "SKU não encontrado.", "SKU not found."),
    ("AMBIGUOUS_SKU", "O código de SKU corresponde a mais de um SKU.", "The SKU code matches more than one SKU."),
    ("HUB_NOT_FOUND", "Hub não encontrado.", "Hub not found."),
    ("INVENTORY_NOT_FOUND", "Saldo de estoque não encontrado.", "Inventory record not found."),
    ("INVENTORY_ALREADY_EXISTS", "Já existe saldo para este SKU neste hub.", "Inventory already exists for this SKU at this hub."),
    ("INSUFFICIENT_STOCK", "Estoque insuficiente: o ajuste deixaria o saldo negativo.", "Insufficient stock: the adjustment would make the quantity negative."),
    ("QUANTITY_OVERFLOW", "O ajuste excede o limite da quantidade.", "The adjustment exceeds the quantity limit."),
    ("STORE_UNAVAILABLE", "Armazenamento temporariamente indisponível. Tente novamente.", "Storage temporarily unavailable. Please retry."),
    ("INVALID_DEADLINE", "O header x-request-timeout-ms deve ser um inteiro positivo.", "The x-request-timeout-ms header must be a positive integer."),
    ("CANCELLED", "A operação foi cancelada: prazo esgotado.", "The operation was cancelled: deadline exceeded."),
    ("INTERNAL_ERROR", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
];

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "pt"];

pub fn translate(lang: &str, code: &str) -> &'static str {
    let entry = MESSAGES
        .iter()
        .find(|(key, _, _)| *key == code)
        .or_else(|| MESSAGES.iter().find(|(key, _, _)| *key == "INTERNAL_ERROR"));

    match (entry, lang) {
        (Some(&(_, pt, _)), "pt") => pt,
        (Some(&(_, _, en)), _) => en,
        (None, _) => "An unexpected error occurred.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_and_generic_message() {
        assert_eq!(translate("pt", "SKU_NOT_FOUND"), "SKU não encontrado.");
        assert_eq!(translate("de", "SKU_NOT_FOUND"), "SKU not found.");
        assert_eq!(translate("en", "SOMETHING_ELSE"), "An unexpected error occurred.");
    }
}
