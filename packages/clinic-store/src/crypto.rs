//! Módulo de criptografia para credenciais
//!
//! Gera as senhas descartáveis das identidades criadas pelo cadastro de
//! pacientes e calcula o hash guardado pelo store local.

use argon2::{
    password_hash::{rand_core::OsRng as HashOsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use zeroize::Zeroizing;

use crate::error::StoreError;

/// Tamanho da senha gerada, em caracteres alfanuméricos
pub const GENERATED_PASSWORD_LEN: usize = 32;

/// Gera uma senha aleatória que é zerada da memória ao sair de escopo
pub fn generate_password() -> Zeroizing<String> {
    let password: String = OsRng
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect();
    Zeroizing::new(password)
}

/// Calcula o hash Argon2id de uma senha
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut HashOsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::CryptoError(e.to_string()))
}

/// Confere uma senha contra um hash no formato PHC
pub fn verify_password(password: &str, hash: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(hash).map_err(|e| StoreError::CryptoError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
