//! Registration payloads and their JSON request envelope.
//!
//! [`Document`] and [`Product`] mirror the camelCase field layout of the registration
//! API. The submitter accepts any [`Serialize`] document, so callers with their own
//! schema are not forced through these types.

// self
use crate::_prelude::*;

/// Goods introduction document accepted by the registration API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
	/// INN of the participant submitting the document.
	pub participant_inn: String,
	/// Document identifier.
	pub doc_id: String,
	/// Document status.
	pub doc_status: String,
	/// Document type, e.g. `LP_INTRODUCE_GOODS`.
	pub doc_type: String,
	/// Whether the goods are imported.
	pub import_request: bool,
	/// INN of the goods owner.
	pub owner_inn: String,
	/// INN of the producer.
	pub producer_inn: String,
	/// Production date.
	pub production_date: String,
	/// Production type.
	pub production_type: String,
	/// Products covered by the document.
	pub products: Vec<Product>,
	/// Registration date.
	pub reg_date: String,
	/// Registration number.
	pub reg_number: String,
}

/// Single product line inside a [`Document`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
	/// Certificate document kind.
	pub certificate_document: String,
	/// Certificate issue date.
	pub certificate_document_date: String,
	/// Certificate number.
	pub certificate_document_number: String,
	/// INN of the goods owner.
	pub owner_inn: String,
	/// INN of the producer.
	pub producer_inn: String,
	/// Production date.
	pub production_date: String,
	/// TN VED commodity code.
	pub tnved_code: String,
	/// Unique identification code.
	pub uit_code: String,
	/// Unique identification code of the package.
	pub uitu_code: String,
}

/// Envelope posted to the registration endpoint.
#[derive(Debug, Serialize)]
pub struct DocumentRequest<'a, D>
where
	D: ?Sized + Serialize,
{
	/// Document being registered.
	pub document: &'a D,
	/// Detached signature over the document.
	pub signature: &'a str,
}
impl<'a, D> DocumentRequest<'a, D>
where
	D: ?Sized + Serialize,
{
	/// Pairs a document with its signature.
	pub fn new(document: &'a D, signature: &'a str) -> Self {
		Self { document, signature }
	}

	/// Encodes the envelope as JSON, reporting the failing field path on error.
	pub fn to_json(&self) -> Result<Vec<u8>> {
		let mut buf = Vec::new();
		let mut serializer = serde_json::Serializer::new(&mut buf);

		serde_path_to_error::serialize(self, &mut serializer)?;

		Ok(buf)
	}
}
