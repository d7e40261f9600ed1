use bon::Builder;
use const_oid::ObjectIdentifier;
use const_oid::db::rfc4519::{COMMON_NAME, COUNTRY_NAME, LOCALITY_NAME, ORGANIZATION_NAME, ST};
use der::Any;
use der::asn1::{PrintableStringRef, SetOfVec, Utf8StringRef};
use time::Duration;
use time::OffsetDateTime;
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::ext::Extension;
use x509_cert::name::{Name, RdnSequence, RelativeDistinguishedName};

use super::extensions::ToAndFromX509Extension;
use crate::error::{CaError, Result};

/// Shortest validity a leaf certificate may be issued for.
pub const MIN_VALIDITY_DAYS: i64 = 1;

/// Longest validity a leaf certificate may be issued for (about ten years).
pub const MAX_VALIDITY_DAYS: i64 = 3650;

const SECONDS_PER_DAY: i64 = 86_400;

/// Clamps a requested leaf validity into
/// [`MIN_VALIDITY_DAYS`]..=[`MAX_VALIDITY_DAYS`]. Out-of-range requests are
/// adjusted, not rejected.
pub fn clamp_validity_days(days: i64) -> i64 {
    days.clamp(MIN_VALIDITY_DAYS, MAX_VALIDITY_DAYS)
}

/// Distinguished name of a certificate subject or issuer.
///
/// # Fields
/// * `common_name` - The common name (CN), must not be empty.
/// * `country` - The country (C).
/// * `state` - The state or province (ST).
/// * `locality` - The locality or city (L).
/// * `organization` - The organization (O).
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to its X.509 form.
    ///
    /// Attributes are emitted in the order C, ST, L, O, CN, one per RDN.
    /// The country is a PrintableString; everything else is UTF8String.
    pub fn as_x509_name(&self) -> Result<Name> {
        if self.common_name.is_empty() {
            return Err(CaError::InvalidInput(
                "common name must not be empty".to_string(),
            ));
        }

        let mut rdns = Vec::new();
        if let Some(country) = &self.country {
            let value = Any::encode_from(&PrintableStringRef::new(country)?)?;
            rdns.push(rdn(COUNTRY_NAME, value)?);
        }
        for (oid, field) in [
            (ST, &self.state),
            (LOCALITY_NAME, &self.locality),
            (ORGANIZATION_NAME, &self.organization),
        ] {
            if let Some(text) = field {
                rdns.push(rdn(oid, utf8(text)?)?);
            }
        }
        rdns.push(rdn(COMMON_NAME, utf8(&self.common_name)?)?);

        Ok(RdnSequence(rdns))
    }

    /// Reads the attributes this type knows about from an X.509 name.
    /// Unknown attributes are ignored.
    pub fn from_x509_name(x509dn: &Name) -> Result<Self> {
        let mut dn = DistinguishedName::default();

        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let slot = match attr.oid {
                    COMMON_NAME => {
                        dn.common_name = attribute_text(attr)?;
                        continue;
                    }
                    COUNTRY_NAME => &mut dn.country,
                    ST => &mut dn.state,
                    LOCALITY_NAME => &mut dn.locality,
                    ORGANIZATION_NAME => &mut dn.organization,
                    _ => continue,
                };
                *slot = Some(attribute_text(attr)?);
            }
        }

        Ok(dn)
    }
}

fn utf8(text: &str) -> Result<Any> {
    Ok(Any::encode_from(&Utf8StringRef::new(text)?)?)
}

fn rdn(oid: ObjectIdentifier, value: Any) -> Result<RelativeDistinguishedName> {
    let atv = AttributeTypeAndValue { oid, value };
    Ok(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?))
}

fn attribute_text(attr: &AttributeTypeAndValue) -> Result<String> {
    if let Ok(s) = attr.value.decode_as::<Utf8StringRef<'_>>() {
        return Ok(s.as_str().to_string());
    }
    attr.value
        .decode_as::<PrintableStringRef<'_>>()
        .map(|s| s.as_str().to_string())
        .map_err(|e| CaError::DecodingError(format!("unsupported name attribute: {e}")))
}

/// Certificate validity period.
///
/// # Fields
/// * `not_before` - The start of the validity period.
/// * `not_after` - The end of the validity period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    ///
    /// Fails with [`CaError::InvalidInput`] if `days` is below one or the
    /// end falls outside the representable date range.
    pub fn for_days(days: i64) -> Result<Self> {
        if days < 1 {
            return Err(CaError::InvalidInput(format!(
                "validity must be at least one day, got {days}"
            )));
        }
        let now = OffsetDateTime::now_utc();
        let not_after = days
            .checked_mul(SECONDS_PER_DAY)
            .map(Duration::seconds)
            .and_then(|lifetime| now.checked_add(lifetime))
            .ok_or_else(|| CaError::InvalidInput(format!("validity of {days} days is too long")))?;
        Ok(Self {
            not_before: now,
            not_after,
        })
    }

    /// Length of the period in whole days.
    pub fn days(&self) -> i64 {
        (self.not_after - self.not_before).whole_days()
    }
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Encodes a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: &E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }

    pub fn from_x509(extension: &Extension) -> Self {
        Self {
            oid: extension.extn_id,
            critical: extension.critical,
            value: extension.extn_value.as_bytes().to_vec(),
        }
    }

    pub fn to_x509(&self) -> Result<Extension> {
        Ok(Extension {
            extn_id: self.oid,
            critical: self.critical,
            extn_value: der::asn1::OctetString::new(self.value.clone())?,
        })
    }

    /// Decodes the value into a specific extension.
    pub fn to_extension<E: ToAndFromX509Extension>(&self) -> Result<E> {
        E::from_x509_extension_value(&self.value)
    }
}
