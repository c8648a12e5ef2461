//! # Settings Form Tests
//!
//! End-to-end flows through the draft settings form into the settings file:
//! - Two configurations (client secret + client certificate) saved together
//! - A certificate entry without a thumbprint is rejected before any write
//! - Switching variants never persists the previous variant's fields
//! - The last entry cannot be removed

mod common;

use common::{TempSettings, SUBSCRIPTION_ID, THUMBPRINT};
use policy_compliance_dashboard::datasource::{
    AuthMethodKind, ConfigurationSet, FormError, FormField, SettingsForm,
};

fn fill(form: &mut SettingsForm, index: usize, fields: &[(FormField, &str)]) {
    for (field, value) in fields {
        form.set_field(index, *field, (*value).to_string())
            .unwrap_or_else(|e| panic!("set {field}: {e}"));
    }
}

fn fill_common(form: &mut SettingsForm, index: usize, vault: &str) {
    fill(
        form,
        index,
        &[
            (FormField::KeyVaultUri, vault),
            (FormField::SubscriptionId, SUBSCRIPTION_ID),
        ],
    );
}

#[tokio::test]
async fn test_two_configurations_are_saved_in_order() {
    let settings = TempSettings::new();
    let store = settings.store();
    let mut form = SettingsForm::from_set(store.load().await);

    fill_common(&mut form, 0, "https://prod-vault.vault.azure.net/");
    fill(
        &mut form,
        0,
        &[
            (FormField::ConfigName, "Production"),
            (FormField::TenantIdSecretName, "prod-tenant-id"),
            (FormField::ClientIdSecretName, "prod-client-id"),
            (FormField::ClientSecretName, "prod-client-secret"),
        ],
    );

    let second = form.add_entry();
    form.switch_auth_method(second, AuthMethodKind::ClientCertificateInKv)
        .expect("switch second entry");
    fill_common(&mut form, second, "https://staging-vault.vault.azure.net/");
    fill(
        &mut form,
        second,
        &[
            (FormField::TenantIdSecretName, "staging-tenant-id"),
            (FormField::ClientIdSecretName, "staging-client-id"),
            (FormField::CertificateThumbprintSecretName, THUMBPRINT),
        ],
    );

    let outcome = form.submit(&store).await;

    assert!(outcome.success, "submission failed: {outcome:?}");
    assert_eq!(outcome.message, "Settings saved successfully.");
    let written = settings.read_json();
    let entries = written["configurations"].as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["apiAuthMethod"], "clientSecretInKv");
    assert_eq!(entries[0]["configName"], "Production");
    assert_eq!(entries[1]["apiAuthMethod"], "clientCertificateInKv");
    assert_eq!(entries[1]["certificateThumbprintSecretName"], THUMBPRINT);
    assert!(entries[1].get("configName").is_none());
}

#[tokio::test]
async fn test_certificate_without_thumbprint_is_not_written() {
    let settings = TempSettings::new();
    let store = settings.store();
    let mut form = SettingsForm::default();

    form.switch_auth_method(0, AuthMethodKind::ClientCertificateInKv)
        .expect("switch");
    fill_common(&mut form, 0, "https://vault.vault.azure.net/");
    fill(
        &mut form,
        0,
        &[
            (FormField::TenantIdSecretName, "tenant"),
            (FormField::ClientIdSecretName, "client"),
        ],
    );
    let before = form.clone();

    let outcome = form.submit(&store).await;

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors[0].path,
        "configurations[0].certificateThumbprintSecretName"
    );
    assert!(!settings.path.exists(), "nothing may be written");
    assert_eq!(form, before, "form state is kept for correction");
}

#[tokio::test]
async fn test_switched_away_fields_are_not_persisted() {
    let settings = TempSettings::new();
    let store = settings.store();
    let mut form = SettingsForm::default();

    fill_common(&mut form, 0, "https://vault.vault.azure.net/");
    fill(&mut form, 0, &[(FormField::ClientSecretName, "x")]);
    form.switch_auth_method(0, AuthMethodKind::ManagedIdentityInKv)
        .expect("switch");

    let outcome = form.submit(&store).await;
    assert!(outcome.success, "submission failed: {outcome:?}");

    let written = std::fs::read_to_string(&settings.path).expect("written");
    assert!(!written.contains("clientSecretName"));
    assert!(!written.contains("tenantIdSecretName"));
    assert_eq!(settings.read_json()["configurations"][0]["apiAuthMethod"], "managedIdentityInKv");
}

#[tokio::test]
async fn test_removing_last_entry_is_a_no_op() {
    let settings = TempSettings::new();
    let mut form = SettingsForm::from_set(settings.store().load().await);
    let before = form.clone();

    assert_eq!(form.remove_entry(0), Err(FormError::LastEntry));
    assert_eq!(form, before);
    assert_eq!(form.len(), 1);
}

#[tokio::test]
async fn test_saved_settings_reseed_the_form() {
    let settings = TempSettings::new();
    let store = settings.store();
    let mut form = SettingsForm::default();
    fill_common(&mut form, 0, "https://vault.vault.azure.net/");
    form.switch_auth_method(0, AuthMethodKind::ManagedIdentityInKv)
        .expect("switch");
    assert!(form.submit(&store).await.success);

    let reloaded = SettingsForm::from_set(store.load().await);
    assert_eq!(reloaded, form);
    assert_ne!(reloaded.to_set(), ConfigurationSet::with_default_entry());
}
