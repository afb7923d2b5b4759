use serde::Serialize;

// O envelope padrão de sucesso da API: {"success": true, "data": ...}
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

// Variante para operações sem payload de retorno, só uma mensagem.
#[derive(Debug, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_de_sucesso_tem_o_formato_padrao() {
        let json = serde_json::to_value(ApiResponse::new(42)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn envelope_de_mensagem_tem_o_formato_padrao() {
        let json = serde_json::to_value(ApiMessage::new("feito")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "feito"}));
    }
}
