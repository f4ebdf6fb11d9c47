//! # Certificate Renderer
//!
//! Formats a proof, and optionally its timestamp token, as a plain-text
//! attestation suitable for embedding in a generated PDF or an email.
//! Rendering only; nothing is checked here.

use shared_types::{SignatureKind, SignatureProof, TimestampToken, TokenStatus};

const RULE: &str = "============================================================";
const LABEL_WIDTH: usize = 22;

fn field(label: &str, value: impl AsRef<str>) -> String {
    format!("  {:<width$}: {}", label, value.as_ref(), width = LABEL_WIDTH)
}

fn or_undisclosed(value: Option<&str>) -> String {
    value.map_or_else(|| "non communiqué".to_string(), str::to_string)
}

fn kind_label(kind: SignatureKind) -> &'static str {
    match kind {
        SignatureKind::Drawn => "manuscrite (tracée)",
        SignatureKind::Typed => "saisie (nom dactylographié)",
    }
}

fn status_label(status: TokenStatus) -> &'static str {
    match status {
        TokenStatus::Granted => "certifié par l'autorité d'horodatage",
        TokenStatus::Rejection => "refusé par l'autorité d'horodatage",
        TokenStatus::Waiting => "en attente auprès de l'autorité d'horodatage",
        TokenStatus::Fallback => "NON CERTIFIÉ (horodatage local de secours)",
    }
}

/// Render the attestation text.
pub fn render(proof: &SignatureProof, token: Option<&TimestampToken>) -> String {
    let signer = &proof.signer;
    let identity = match (signer.identity_verified, signer.identity_method.as_deref()) {
        (true, Some(method)) => format!("vérifiée ({method})"),
        (true, None) => "vérifiée".to_string(),
        (false, _) => "non vérifiée".to_string(),
    };
    let geolocation = proof.metadata.geolocation.map(|geo| match geo.accuracy {
        Some(accuracy) => format!("{:.5}, {:.5} (± {:.0} m)", geo.lat, geo.lon, accuracy),
        None => format!("{:.5}, {:.5}", geo.lat, geo.lon),
    });

    let mut lines = vec![
        RULE.to_string(),
        "          CERTIFICAT DE SIGNATURE ÉLECTRONIQUE".to_string(),
        RULE.to_string(),
        String::new(),
        field("Référence", &proof.proof_id),
        String::new(),
        "DOCUMENT".to_string(),
        field("Type", &proof.document.document_type),
        field("Identifiant", &proof.document.id),
        field("Empreinte (SHA-256)", &proof.document.hash),
        String::new(),
        "SIGNATAIRE".to_string(),
        field("Nom", &signer.name),
        field("Email", &signer.email),
        field("Identité", identity),
    ];
    if let Some(profile) = &signer.profile_ref {
        lines.push(field("Profil", profile));
    }
    lines.extend([
        String::new(),
        "SIGNATURE".to_string(),
        field("Type", kind_label(proof.signature.kind)),
        field("Empreinte (SHA-256)", &proof.signature.hash),
        field(
            "Date (client)",
            format!("{} ({})", proof.timestamp.iso8601, proof.timestamp.timezone),
        ),
        String::new(),
        "INFORMATIONS TECHNIQUES".to_string(),
        field("Navigateur", &proof.metadata.user_agent),
        field("Écran", &proof.metadata.screen_descriptor),
        field(
            "Écran tactile",
            if proof.metadata.is_touch_device { "oui" } else { "non" },
        ),
        field("Adresse IP", or_undisclosed(proof.metadata.ip.as_deref())),
        field("Géolocalisation", or_undisclosed(geolocation.as_deref())),
        String::new(),
        "INTÉGRITÉ".to_string(),
        field("Algorithme", &proof.integrity.algorithm),
        field("Empreinte de la preuve", &proof.integrity.proof_hash),
    ]);

    if let Some(token) = token {
        lines.extend([
            String::new(),
            "HORODATAGE".to_string(),
            field("Fournisseur", &token.provider),
            field("Date", &token.timestamp),
            field("Statut", status_label(token.status)),
            field("Empreinte horodatée", &token.document_hash),
        ]);
        if let Some(serial) = &token.serial_number {
            lines.push(field("Numéro de série", serial));
        }
        if let Some(policy) = &token.policy_oid {
            lines.push(field("Politique", policy));
        }
    }

    lines.extend([String::new(), RULE.to_string()]);
    lines.join("\n") + "\n"
}
