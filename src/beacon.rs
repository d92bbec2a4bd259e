use tracing::debug;

use crate::{
    client::AppChains,
    errors::Result,
    transport::{HttpRequest, Transport},
};

pub const SEQUENCING_BEACON: &str = "SequencingBeacon";
pub const PUBLIC_BEACONS: &str = "PublicBeacons";

/// Beacon lookups are plain unauthenticated GETs, the body comes back as is.
impl<T: Transport> AppChains<T> {
    pub async fn get_sequencing_beacon(&self, chrom: u32, pos: u64, allele: &str) -> Result<String> {
        self.get_beacon(SEQUENCING_BEACON, &beacon_parameters(chrom, pos, allele)).await
    }

    pub async fn get_public_beacon(&self, chrom: u32, pos: u64, allele: &str) -> Result<String> {
        self.get_beacon(PUBLIC_BEACONS, &beacon_parameters(chrom, pos, allele)).await
    }

    pub async fn get_beacon(&self, method_name: &str, parameters: &[(String, String)]) -> Result<String> {
        let pairs = parameters
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect::<Vec<_>>();

        let url = self.endpoints.beacon(method_name, &pairs)?;
        self.beacon_request(HttpRequest::get(url)).await
    }

    /// `query` must already be URL-encoded.
    pub async fn get_beacon_query(&self, method_name: &str, query: &str) -> Result<String> {
        let url = self.endpoints.beacon_with_query(method_name, query)?;
        self.beacon_request(HttpRequest::get(url)).await
    }

    async fn beacon_request(&self, request: HttpRequest) -> Result<String> {
        debug!("Beacon lookup {}", request.url);
        let response = self.transport.send(request).await?;
        response.into_text()
    }
}

fn beacon_parameters(chrom: u32, pos: u64, allele: &str) -> Vec<(String, String)> {
    vec![
        ("chrom".to_string(), chrom.to_string()),
        ("pos".to_string(), pos.to_string()),
        ("allele".to_string(), allele.to_string()),
    ]
}
