use crate::api::{ApiError, ApiResult};
use crate::models::{ListQuery, Location, LocationPage, LocationRow};
use crate::util::{format_created_at, or_placeholder};

pub(crate) const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 20, 50];
const DEFAULT_PAGE_SIZE: usize = 10;

const DELETE_FAILED: &str = "Failed to delete location";
const DELETE_UNREACHABLE: &str = "Error deleting location";

/// Project one page of records into table rows.
///
/// `order` is `page * page_size + i + 1` for the record at index `i`.
pub(crate) fn map_rows(page: usize, page_size: usize, records: Vec<Location>) -> Vec<LocationRow> {
    let offset = page * page_size;
    records
        .into_iter()
        .enumerate()
        .map(|(i, loc)| LocationRow {
            id: loc.id.clone(),
            order: offset + i + 1,
            location_name: loc.location_name.clone(),
            lat: loc.lat.to_string(),
            lng: loc.lng.to_string(),
            itinerary_tip: or_placeholder(loc.itinerary_tip.as_deref()),
            best_time_to_visit: or_placeholder(loc.best_time_to_visit.as_deref()),
            created_at: format_created_at(loc.created_at.as_deref()),
            record: loc,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FetchOutcome {
    Applied,
    Failed(ApiError),
    /// A newer request was issued after this one; nothing was changed.
    Stale,
}

/// Pagination, search, rows and dialogs of the location table.
#[derive(Clone, Debug)]
pub(crate) struct LocationListState {
    pub page: usize,
    pub page_size: usize,
    pub search_text: String,

    pub rows: Vec<LocationRow>,
    pub total_count: u64,
    pub loading: bool,

    pub selected: Option<Location>,
    pub detail_open: bool,

    /// Row awaiting delete confirmation.
    pub pending_delete: Option<LocationRow>,
    pub deleting: bool,

    /// Latest issued fetch; older responses are discarded.
    request_seq: u64,
    issued: Option<ListQuery>,
}

impl Default for LocationListState {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationListState {
    pub fn new() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search_text: String::new(),
            rows: vec![],
            total_count: 0,
            loading: false,
            selected: None,
            detail_open: false,
            pending_delete: None,
            deleting: false,
            request_seq: 0,
            issued: None,
        }
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search_text.clone(),
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 || page_size == self.page_size {
            return;
        }
        self.page_size = page_size;
        self.page = 0;
    }

    pub fn set_search(&mut self, text: String) {
        if text == self.search_text {
            return;
        }
        self.search_text = text;
        self.page = 0;
    }

    pub fn page_count(&self) -> usize {
        let total = usize::try_from(self.total_count).unwrap_or(usize::MAX);
        total.div_ceil(self.page_size.max(1)).max(1)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    /// `"11–20 of 34"`, or `"0 of 0"` when empty.
    pub fn range_caption(&self) -> String {
        if self.rows.is_empty() {
            return format!("0 of {}", self.total_count);
        }
        let first = self.page * self.page_size + 1;
        let last = first + self.rows.len() - 1;
        format!("{first}–{last} of {}", self.total_count)
    }

    /// Mark a fetch as started and return its tag and query.
    pub fn begin_fetch(&mut self) -> (u64, ListQuery) {
        self.request_seq = self.request_seq.saturating_add(1);
        self.loading = true;
        let query = self.query();
        self.issued = Some(query.clone());
        (self.request_seq, query)
    }

    /// Apply a fetch result if it belongs to the latest request.
    ///
    /// On failure rows and total are left untouched. `loading` is cleared on
    /// every non-stale exit.
    pub fn finish_fetch(&mut self, seq: u64, result: ApiResult<LocationPage>) -> FetchOutcome {
        if seq != self.request_seq {
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                let issued = self.issued.take().unwrap_or_else(|| self.query());
                self.rows = map_rows(issued.page, issued.page_size, page.records);
                self.total_count = page.total;
                FetchOutcome::Applied
            }
            Err(e) => FetchOutcome::Failed(e),
        }
    }

    pub fn view(&mut self, record: Location) {
        self.selected = Some(record);
        self.detail_open = true;
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
        self.selected = None;
    }

    pub fn request_delete(&mut self, id: &str) {
        if self.deleting {
            return;
        }
        self.pending_delete = self.rows.iter().find(|r| r.id == id).cloned();
    }

    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.pending_delete = None;
        }
    }

    /// Confirm the pending delete; returns the id to send, or `None` if there
    /// is nothing to confirm or a delete is already running.
    pub fn begin_delete(&mut self) -> Option<String> {
        if self.deleting {
            return None;
        }
        let id = self.pending_delete.as_ref()?.id.clone();
        self.deleting = true;
        Some(id)
    }

    /// On success the row is dropped locally without refetching. On failure
    /// rows are untouched and the message to alert is returned.
    pub fn finish_delete(&mut self, id: &str, result: ApiResult<()>) -> Result<(), String> {
        self.deleting = false;
        self.pending_delete = None;

        match result {
            Ok(()) => {
                self.remove_location(id);
                Ok(())
            }
            Err(e) => Err(e.describe(DELETE_FAILED, DELETE_UNREACHABLE)),
        }
    }

    pub fn remove_location(&mut self, id: &str) {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        if self.rows.len() != before {
            self.total_count = self.total_count.saturating_sub(1);
        }

        if self.selected.as_ref().is_some_and(|s| s.id == id) {
            self.close_detail();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loc(id: &str) -> Location {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "locationName": format!("Place {id}"),
            "lat": 1,
            "lng": 2,
        }))
        .expect("fixture should parse")
    }

    fn page_of(ids: &[&str], total: u64) -> LocationPage {
        LocationPage {
            records: ids.iter().map(|id| loc(id)).collect(),
            total,
        }
    }

    fn loaded(ids: &[&str]) -> LocationListState {
        let mut s = LocationListState::new();
        let (seq, _) = s.begin_fetch();
        s.finish_fetch(seq, Ok(page_of(ids, ids.len() as u64)));
        s
    }

    #[test]
    fn row_order_is_contiguous_for_any_page() {
        for page in 0..5 {
            for size in PAGE_SIZE_OPTIONS {
                let count = size - 3;
                let records = (0..count).map(|i| loc(&i.to_string())).collect();
                let orders: Vec<usize> = map_rows(page, size, records)
                    .iter()
                    .map(|r| r.order)
                    .collect();
                let expected: Vec<usize> = (page * size + 1..=page * size + count).collect();
                assert_eq!(orders, expected, "page {page} size {size}");
            }
        }
    }

    #[test]
    fn single_record_scenario() {
        let body = r#"{"data":{"locations":[{"_id":"a","locationName":"X","lat":1,"lng":2}],"pagination":{"total":1}}}"#;
        let page = crate::api::parse_location_list(body).expect("should parse");

        let mut s = LocationListState::new();
        let (seq, q) = s.begin_fetch();
        assert_eq!((q.page, q.page_size), (0, 10));
        assert_eq!(s.finish_fetch(seq, Ok(page)), FetchOutcome::Applied);

        assert_eq!(s.rows.len(), 1);
        let row = &s.rows[0];
        assert_eq!(row.order, 1);
        assert_eq!(row.location_name, "X");
        assert_eq!(row.itinerary_tip, "-");
        assert_eq!(row.best_time_to_visit, "-");
        assert_eq!(row.created_at, "-");
        assert_eq!(s.total_count, 1);
    }

    #[test]
    fn odd_coordinates_do_not_blank_the_page() {
        let body = r#"{"data":{"locations":[
            {"_id":"a","locationName":"Good","lat":46.36,"lng":14},
            {"_id":"b","locationName":"Comma","lat":"12,5","lng":null},
            {"_id":"c","locationName":"Bare"}
        ],"pagination":{"total":3}}}"#;
        let page = crate::api::parse_location_list(body).expect("mixed page should parse");

        let mut s = LocationListState::new();
        let (seq, _) = s.begin_fetch();
        assert_eq!(s.finish_fetch(seq, Ok(page)), FetchOutcome::Applied);

        let coords: Vec<(&str, &str)> = s
            .rows
            .iter()
            .map(|r| (r.lat.as_str(), r.lng.as_str()))
            .collect();
        assert_eq!(coords, vec![("46.36", "14"), ("12,5", ""), ("", "")]);
    }

    #[test]
    fn loading_is_set_and_cleared_on_both_paths() {
        let mut s = LocationListState::new();
        let (seq, _) = s.begin_fetch();
        assert!(s.loading);
        s.finish_fetch(seq, Ok(page_of(&["a"], 1)));
        assert!(!s.loading);

        let (seq, _) = s.begin_fetch();
        assert!(s.loading);
        let outcome = s.finish_fetch(seq, Err(ApiError::Network("down".to_string())));
        assert!(matches!(outcome, FetchOutcome::Failed(ApiError::Network(_))));
        assert!(!s.loading);
    }

    #[test]
    fn failed_fetch_keeps_previous_rows() {
        let mut s = loaded(&["a", "b"]);
        s.set_page(1);
        let (seq, _) = s.begin_fetch();
        s.finish_fetch(
            seq,
            Err(ApiError::Server {
                status: 500,
                message: None,
            }),
        );

        let ids: Vec<&str> = s.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(s.total_count, 2);
    }

    #[test]
    fn out_of_order_response_is_discarded() {
        let mut s = LocationListState::new();
        let (first, _) = s.begin_fetch();
        s.set_page(1);
        let (second, q) = s.begin_fetch();
        assert_eq!(q.page, 1);

        assert_eq!(
            s.finish_fetch(second, Ok(page_of(&["k"], 30))),
            FetchOutcome::Applied
        );
        assert_eq!(s.rows[0].order, 11);

        assert_eq!(
            s.finish_fetch(first, Ok(page_of(&["stale"], 99))),
            FetchOutcome::Stale
        );
        assert_eq!(s.rows[0].id, "k");
        assert_eq!(s.total_count, 30);
        assert!(!s.loading);
    }

    #[test]
    fn stale_response_does_not_clear_loading() {
        let mut s = LocationListState::new();
        let (first, _) = s.begin_fetch();
        let _ = s.begin_fetch();
        s.finish_fetch(first, Ok(page_of(&["a"], 1)));
        assert!(s.loading);
    }

    #[test]
    fn rows_use_the_query_that_was_issued() {
        let mut s = LocationListState::new();
        s.set_page(2);
        let (seq, _) = s.begin_fetch();
        // Page moved again before the effect re-fetched.
        s.set_page(3);
        s.finish_fetch(seq, Ok(page_of(&["a"], 40)));
        assert_eq!(s.rows[0].order, 21);
    }

    #[test]
    fn search_and_page_size_reset_page() {
        let mut s = LocationListState::new();
        s.set_page(4);
        s.set_search("lake".to_string());
        assert_eq!(s.page, 0);
        assert_eq!(s.query().search, "lake");

        s.set_page(2);
        s.set_search("lake".to_string());
        assert_eq!(s.page, 2, "unchanged search keeps the page");

        s.set_page_size(50);
        assert_eq!((s.page, s.page_size), (0, 50));
    }

    #[test]
    fn paging_bounds_follow_total() {
        let mut s = loaded(&["a"]);
        s.total_count = 25;
        assert_eq!(s.page_count(), 3);
        assert!(!s.has_prev());
        assert!(s.has_next());

        s.set_page(2);
        assert!(s.has_prev());
        assert!(!s.has_next());

        s.total_count = 0;
        assert_eq!(s.page_count(), 1);
    }

    #[test]
    fn range_caption_reflects_page() {
        let mut s = LocationListState::new();
        assert_eq!(s.range_caption(), "0 of 0");

        s.set_page(1);
        let (seq, _) = s.begin_fetch();
        s.finish_fetch(seq, Ok(page_of(&["a", "b", "c"], 13)));
        assert_eq!(s.range_caption(), "11–13 of 13");
    }

    #[test]
    fn view_and_close_detail() {
        let mut s = loaded(&["a"]);
        s.view(s.rows[0].record.clone());
        assert!(s.detail_open);
        assert_eq!(s.selected.as_ref().map(|l| l.id.as_str()), Some("a"));

        s.close_detail();
        assert!(!s.detail_open);
        assert!(s.selected.is_none());
    }

    #[test]
    fn confirmed_delete_removes_exactly_that_row_and_closes_its_detail() {
        let mut s = loaded(&["a", "b", "c"]);
        s.view(s.rows[1].record.clone());

        s.request_delete("b");
        let id = s.begin_delete().expect("pending delete");
        assert_eq!(id, "b");
        assert!(s.deleting);

        assert_eq!(s.finish_delete(&id, Ok(())), Ok(()));
        let ids: Vec<&str> = s.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(s.total_count, 2);
        assert!(!s.detail_open);
        assert!(s.pending_delete.is_none());
        assert!(!s.deleting);
    }

    #[test]
    fn deleting_another_row_keeps_detail_open() {
        let mut s = loaded(&["a", "b"]);
        s.view(s.rows[0].record.clone());
        s.request_delete("b");
        let id = s.begin_delete().expect("pending delete");
        s.finish_delete(&id, Ok(())).expect("delete ok");
        assert!(s.detail_open);
    }

    #[test]
    fn failed_delete_leaves_rows_unchanged() {
        let mut s = loaded(&["a", "b"]);
        s.request_delete("a");
        let id = s.begin_delete().expect("pending delete");

        let err = ApiError::from_failure(400, r#"{"message":"Location is in use"}"#);
        assert_eq!(s.finish_delete(&id, Err(err)), Err("Location is in use".to_string()));
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.total_count, 2);

        s.request_delete("a");
        let id = s.begin_delete().expect("pending delete");
        assert_eq!(
            s.finish_delete(&id, Err(ApiError::Network("offline".to_string()))),
            Err("Error deleting location".to_string())
        );
        assert_eq!(
            s.finish_delete("a", Err(ApiError::from_failure(500, ""))),
            Err("Failed to delete location".to_string())
        );
    }

    #[test]
    fn cancelled_delete_sends_nothing() {
        let mut s = loaded(&["a"]);
        s.request_delete("a");
        s.cancel_delete();
        assert!(s.begin_delete().is_none());
        assert_eq!(s.rows.len(), 1);
    }

    #[test]
    fn second_confirm_while_deleting_is_ignored() {
        let mut s = loaded(&["a"]);
        s.request_delete("a");
        assert!(s.begin_delete().is_some());
        assert!(s.begin_delete().is_none());
    }
}
