// src/services/storage.rs
//
// Cliente do serviço externo de armazenamento de comprovantes.
// Convenção de chave: solicitacao_{id}.pdf, um documento por solicitação
// (upload com semântica de upsert/sobrescrita).

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Clone)]
pub struct StorageService {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

#[derive(Deserialize)]
struct AssinaturaResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

impl StorageService {
    pub fn new(base_url: String, bucket: String, service_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            service_key,
        }
    }

    pub fn chave_comprovante(solicitacao_id: Uuid) -> String {
        format!("solicitacao_{solicitacao_id}.pdf")
    }

    /// Sobe (ou sobrescreve) o comprovante da solicitação.
    pub async fn upload(&self, chave: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, chave);

        let resposta = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes)
            .send()
            .await?;

        if !resposta.status().is_success() {
            let status = resposta.status();
            let corpo = resposta.text().await.unwrap_or_default();
            return Err(AppError::StorageError(format!(
                "upload do comprovante falhou ({status}): {corpo}"
            )));
        }

        tracing::info!("📎 Comprovante enviado: {chave}");
        Ok(())
    }

    /// URL assinada de curta duração para leitura do comprovante.
    pub async fn criar_url_assinada(
        &self,
        chave: &str,
        ttl_segundos: u64,
    ) -> Result<String, AppError> {
        let url = format!("{}/object/sign/{}/{}", self.base_url, self.bucket, chave);

        let resposta = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&json!({ "expiresIn": ttl_segundos }))
            .send()
            .await?;

        if !resposta.status().is_success() {
            let status = resposta.status();
            let corpo = resposta.text().await.unwrap_or_default();
            return Err(AppError::StorageError(format!(
                "assinatura de URL falhou ({status}): {corpo}"
            )));
        }

        let assinatura: AssinaturaResponse = resposta.json().await?;
        Ok(format!("{}{}", self.base_url, assinatura.signed_url))
    }
}
