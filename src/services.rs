pub mod finance;
pub mod lifecycle;
pub mod provisioning;
pub mod relatorio;
pub mod solicitacao_service;
pub mod storage;
