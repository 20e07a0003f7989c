use quick_xml::Reader;
use quick_xml::events::Event;

use crate::Error;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub domain: String,
    pub rank: u32,
    pub global_rank: Option<u32>,
}

/// One page of a `TopSites` response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopSitesPage {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    pub total_sites: Option<u64>,
    pub sites: Vec<Site>,
}

#[derive(Default)]
struct PartialSite {
    domain: Option<String>,
    rank: Option<u32>,
    global_rank: Option<u32>,
}

impl PartialSite {
    fn finish(self) -> Result<Site> {
        Ok(Site {
            domain: self.domain.ok_or(Error::MissingField("DataUrl"))?,
            rank: self.rank.ok_or(Error::MissingField("Rank"))?,
            global_rank: self.global_rank,
        })
    }
}

#[derive(Default)]
struct PageBuilder {
    page: TopSitesPage,
    site: Option<PartialSite>,
    error_code: Option<String>,
    error_message: Option<String>,
}

impl PageBuilder {
    fn text(&mut self, path: &[String], text: String) -> Result<()> {
        let [.., parent, leaf] = path else {
            return Ok(());
        };
        match (parent.as_str(), leaf.as_str()) {
            (_, "DataUrl") => {
                if let Some(site) = self.site.as_mut() {
                    site.domain = Some(text);
                }
            }
            ("Country", "Rank") => {
                if let Some(site) = self.site.as_mut() {
                    site.rank = Some(parse_rank(&text)?);
                }
            }
            ("Global", "Rank") => {
                if let Some(site) = self.site.as_mut() {
                    site.global_rank = Some(parse_rank(&text)?);
                }
            }
            ("List", "CountryName") => self.page.country_name = Some(text),
            ("List", "CountryCode") => self.page.country_code = Some(text),
            ("List", "TotalSites") => {
                let total = text
                    .parse()
                    .map_err(|_| Error::Xml(format!("invalid TotalSites {text:?}")))?;
                self.page.total_sites = Some(total);
            }
            ("Error", "Code") => self.error_code = Some(text),
            ("Error", "Message") => self.error_message = Some(text),
            _ => {}
        }
        Ok(())
    }

    fn finish_site(&mut self) -> Result<()> {
        if let Some(partial) = self.site.take() {
            self.page.sites.push(partial.finish()?);
        }
        Ok(())
    }
}

pub fn parse_top_sites(xml: &str) -> Result<TopSitesPage> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut builder = PageBuilder::default();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "Site" {
                    builder.site = Some(PartialSite::default());
                }
                seen_root = true;
                path.push(name);
            }
            Event::End(e) => {
                path.pop();
                if e.local_name().as_ref() == b"Site" {
                    builder.finish_site()?;
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if e.local_name().as_ref() == b"Site" {
                    builder.site = Some(PartialSite::default());
                    builder.finish_site()?;
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(xml_error)?.into_owned();
                builder.text(&path, text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).trim().to_string();
                builder.text(&path, text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(Error::Xml("document has no root element".to_string()));
    }
    if !path.is_empty() {
        return Err(Error::Xml(format!("unexpected end of document inside <{}>", path.join("/"))));
    }
    if let Some(code) = builder.error_code {
        return Err(Error::Api {
            code,
            message: builder.error_message.unwrap_or_default(),
        });
    }

    Ok(builder.page)
}

/// Extracts the service error from a non-success response body, if it carries one.
pub fn parse_error(xml: &str) -> Option<Error> {
    match parse_top_sites(xml) {
        Err(e @ Error::Api { .. }) => Some(e),
        _ => None,
    }
}

fn parse_rank(text: &str) -> Result<u32> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidRank(text.to_string()))
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::Xml(e.to_string())
}
