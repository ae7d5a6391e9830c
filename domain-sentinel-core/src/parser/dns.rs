//! DNS provider inference from name servers.

/// Ordered substring table; the first match against the joined, lowercased
/// name-server list wins. More specific entries come before generic ones
/// (`googledomains` before `google`).
const NS_PROVIDERS: [(&str, &str); 22] = [
    ("cloudflare", "Cloudflare"),
    ("dnspod", "DNSPod"),
    ("alidns", "Aliyun DNS"),
    ("hichina", "Aliyun DNS"),
    ("awsdns", "Amazon Route 53"),
    ("azure-dns", "Azure DNS"),
    ("googledomains", "Google Domains"),
    ("google", "Google Cloud DNS"),
    ("domaincontrol", "GoDaddy"),
    ("registrar-servers", "Namecheap"),
    ("dnsimple", "DNSimple"),
    ("digitalocean", "DigitalOcean"),
    ("linode", "Linode"),
    ("vercel-dns", "Vercel"),
    ("nsone", "NS1"),
    ("ultradns", "UltraDNS"),
    ("markmonitor", "MarkMonitor"),
    ("gandi", "Gandi"),
    ("ovh", "OVH"),
    ("he.net", "Hurricane Electric"),
    ("cloudns", "ClouDNS"),
    ("dns.com", "DNS.COM"),
];

/// Infers a display name for the DNS provider from the name-server list.
///
/// Falls back to the registrable-domain suffix of the first name server when
/// no known provider matches; best-effort by design.
pub(crate) fn infer_dns_provider(name_servers: &[String]) -> Option<String> {
    if name_servers.is_empty() {
        return None;
    }

    let joined = name_servers.join(",").to_lowercase();
    for (needle, provider) in NS_PROVIDERS {
        if joined.contains(needle) {
            return Some(provider.to_string());
        }
    }

    registrable_suffix(&name_servers[0])
}

/// Last two labels of a host name: "ns1.example-dns.net" -> "example-dns.net".
fn registrable_suffix(host: &str) -> Option<String> {
    let trimmed = host.trim().trim_end_matches('.').to_lowercase();
    let labels: Vec<&str> = trimmed.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() < 2 {
        return None;
    }
    Some(labels[labels.len() - 2..].join("."))
}
