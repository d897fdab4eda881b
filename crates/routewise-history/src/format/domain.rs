//! Domain literal formatters for compound field categories.
//!
//! Each renderer receives the whole [`FormatInput`] so it can reach the
//! lookup maps and configuration; nested values are rendered through
//! [`FormatInput::with_value`] where a sub-value needs the same treatment.

use routewise_core::ChangeValue;

use super::labels::{
    document_type_label, is_weekday, status_label, time_of_day_label, vehicle_type_label, WEEKDAYS,
};
use super::{stringify, FormatInput};
use crate::resolver::{full_name, NOT_PROVIDED};
use crate::text::{capitalize, join_present, upper_first};

const NO_ADDRESS: &str = "No address provided";

fn items(value: &ChangeValue) -> Vec<&ChangeValue> {
    match value {
        ChangeValue::Collection(items) => items.iter().filter(|v| v.is_present()).collect(),
        ChangeValue::Absent => Vec::new(),
        other => vec![other],
    }
}

fn list_or(rendered: Vec<String>, sep: &str, empty: &str) -> String {
    let rendered: Vec<String> = rendered.into_iter().filter(|s| !s.is_empty()).collect();
    if rendered.is_empty() {
        empty.to_string()
    } else {
        rendered.join(sep)
    }
}

fn date_range(input: &FormatInput<'_>, from: Option<&ChangeValue>, to: Option<&ChangeValue>) -> Option<String> {
    match (input.date_text(from), input.date_text(to)) {
        (Some(from), Some(to)) => Some(format!("{from} - {to}")),
        (Some(from), None) => Some(format!("from {from}")),
        (None, Some(to)) => Some(format!("until {to}")),
        (None, None) => None,
    }
}

fn time_range(value: &ChangeValue) -> Option<String> {
    let start = value.get_any(&["start", "open", "openingTime", "startTime"])?;
    let end = value.get_any(&["end", "close", "closingTime", "endTime"])?;
    Some(format!("{} - {}", start.as_text()?, end.as_text()?))
}

// ─── Documents & vehicles ────────────────────────────────────────────

fn one_document(input: &FormatInput<'_>, doc: &ChangeValue) -> String {
    if !doc.is_composite() {
        return stringify(doc);
    }
    let name = doc.get_any(&["fileName", "name", "originalName"]).and_then(ChangeValue::as_text);
    let kind = doc
        .get_any(&["type", "documentType"])
        .and_then(ChangeValue::as_text)
        .map(|t| format!("({})", document_type_label(&t)));
    let head = join_present([name, kind], " ");
    let issued = input
        .date_text(doc.get_any(&["issueDate", "issuedDate", "issuedAt"]))
        .map(|d| format!("Issued: {d}"));
    let expires = input
        .date_text(doc.get_any(&["expiryDate", "expiresAt"]))
        .map(|d| format!("Expires: {d}"));
    let rendered = join_present([Some(head), doc.text_of("description"), issued, expires], " - ");
    if rendered.is_empty() {
        "No document details".to_string()
    } else {
        rendered
    }
}

pub(super) fn document(input: &FormatInput<'_>) -> String {
    let docs = items(input.value);
    list_or(docs.into_iter().map(|d| one_document(input, d)).collect(), "; ", "None")
}

pub(super) fn vehicle(input: &FormatInput<'_>) -> String {
    let v = input.value;
    let registration = v
        .get_any(&["registration", "registrationNumber", "reg"])
        .and_then(ChangeValue::as_text)
        .map(|r| r.to_uppercase());
    let make_model = join_present([v.text_of("make"), v.text_of("model")], " ");
    let kind = v
        .get_any(&["type", "vehicleType"])
        .and_then(ChangeValue::as_text)
        .map(|t| vehicle_type_label(&t));
    let capacity = v
        .get_any(&["capacity", "seats"])
        .and_then(ChangeValue::as_text)
        .map(|c| format!("{c} seats"));
    let detail = join_present([kind, capacity], ", ");
    let head = join_present([registration, Some(make_model)], " - ");
    match (head.is_empty(), detail.is_empty()) {
        (true, true) => "No vehicle details".to_string(),
        (false, true) => head,
        (true, false) => detail,
        (false, false) => format!("{head} ({detail})"),
    }
}

// ─── People & places ─────────────────────────────────────────────────

fn address_text(value: &ChangeValue) -> Option<String> {
    if let Some(text) = value.as_text() {
        return Some(text);
    }
    let joined = join_present(
        [
            value.get_any(&["street", "line1", "addressLine1"]).and_then(ChangeValue::as_text),
            value.get_any(&["line2", "addressLine2"]).and_then(ChangeValue::as_text),
            value.get_any(&["city", "town"]).and_then(ChangeValue::as_text),
            value.text_of("county"),
            value.get_any(&["postcode", "postCode"]).and_then(ChangeValue::as_text),
        ],
        ", ",
    );
    (!joined.is_empty()).then_some(joined)
}

pub(super) fn address(input: &FormatInput<'_>) -> String {
    address_text(input.value).unwrap_or_else(|| NO_ADDRESS.to_string())
}

fn person_name(value: &ChangeValue) -> Option<String> {
    full_name(value).filter(|n| n != NOT_PROVIDED)
}

pub(super) fn emergency_contact(input: &FormatInput<'_>) -> String {
    let v = input.value;
    let name = person_name(v);
    let relationship = v.text_of("relationship").map(|r| format!("({})", capitalize(&r)));
    let head = join_present([name, relationship], " ");
    let rendered = join_present([Some(head), v.get_any(&["phone", "mobile"]).and_then(ChangeValue::as_text)], " - ");
    if rendered.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        rendered
    }
}

fn parent_summary(parent: &ChangeValue) -> String {
    let name = person_name(parent);
    let relationship = parent.text_of("relationship").map(|r| format!("({})", capitalize(&r)));
    let head = join_present([name, relationship], " ");
    join_present(
        [
            Some(head),
            parent.text_of("email"),
            parent.get_any(&["phone", "mobile"]).and_then(ChangeValue::as_text),
            parent.get("address").and_then(address_text),
        ],
        ", ",
    )
}

pub(super) fn parents(input: &FormatInput<'_>) -> String {
    let all = items(input.value);
    if all.is_empty() {
        return "No parent details".to_string();
    }
    let primary_idx = all
        .iter()
        .position(|p| p.get("isPrimary").and_then(ChangeValue::as_bool) == Some(true))
        .unwrap_or(0);

    let mut parts = vec![format!("Primary: {}", parent_summary(all[primary_idx]))];
    let others: Vec<&ChangeValue> = all
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != primary_idx)
        .map(|(_, p)| *p)
        .collect();
    if let Some((secondary, rest)) = others.split_first() {
        parts.push(format!("Secondary: {}", parent_summary(secondary)));
        for other in rest {
            parts.push(format!("Other: {}", parent_summary(other)));
        }
    }
    parts.join("; ")
}

pub(super) fn relationship(input: &FormatInput<'_>) -> String {
    capitalize(&input.value.as_text().unwrap_or_default())
}

// ─── Training & care ─────────────────────────────────────────────────

fn training_name(input: &FormatInput<'_>, record: &ChangeValue) -> String {
    match record.get_any(&["trainingId", "training", "courseId"]) {
        Some(embedded @ ChangeValue::Composite(_)) => person_name(embedded)
            .or_else(|| embedded.text_of("title"))
            .unwrap_or_else(|| "Training".to_string()),
        Some(id) => {
            let resolver = input.resolver().with_names(input.ctx.training_names);
            resolver.resolve(id)
        }
        None => record
            .get_any(&["trainingName", "name", "title"])
            .and_then(ChangeValue::as_text)
            .unwrap_or_else(|| "Training".to_string()),
    }
}

fn one_training(input: &FormatInput<'_>, record: &ChangeValue) -> String {
    if !record.is_composite() {
        let resolver = input.resolver().with_names(input.ctx.training_names);
        return resolver.resolve(record);
    }
    join_present(
        [
            Some(training_name(input, record)),
            record.text_of("certificateNumber").map(|c| format!("Certificate: {c}")),
            input
                .date_text(record.get_any(&["completionDate", "completedAt"]))
                .map(|d| format!("Completed: {d}")),
            input
                .date_text(record.get_any(&["expiryDate", "expiresAt"]))
                .map(|d| format!("Expires: {d}")),
            record.text_of("status").map(|s| format!("Status: {}", status_label(&s))),
        ],
        " - ",
    )
}

pub(super) fn training(input: &FormatInput<'_>) -> String {
    let records = items(input.value);
    list_or(records.into_iter().map(|t| one_training(input, t)).collect(), "; ", "None")
}

fn one_care_need(need: &ChangeValue) -> String {
    if !need.is_composite() {
        return need.as_text().unwrap_or_default();
    }
    let kind = need.get_any(&["type", "need", "name", "condition"]).and_then(ChangeValue::as_text);
    let detail = need.get_any(&["description", "details", "notes"]).and_then(ChangeValue::as_text);
    match (kind, detail) {
        (Some(kind), Some(detail)) => format!("{}: {detail}", upper_first(&kind)),
        (Some(kind), None) => upper_first(&kind),
        (None, Some(detail)) => detail,
        (None, None) => String::new(),
    }
}

pub(super) fn special_care_needs(input: &FormatInput<'_>) -> String {
    list_or(items(input.value).into_iter().map(one_care_need).collect(), "; ", "None")
}

// ─── Route & school composites ───────────────────────────────────────

pub(super) fn temporary_driver(input: &FormatInput<'_>) -> String {
    let v = input.value;
    let driver = v
        .get_any(&["driver", "driverId"])
        .map(|d| input.resolver().resolve(d))
        .unwrap_or_else(|| NOT_PROVIDED.to_string());
    let period = join_present(
        [
            date_range(input, v.get_any(&["startDate", "from"]), v.get_any(&["endDate", "to"])),
            v.get_any(&["timeOfDay", "period"])
                .and_then(ChangeValue::as_text)
                .map(|t| time_of_day_label(&t)),
        ],
        ", ",
    );
    let head = if period.is_empty() {
        driver
    } else {
        format!("{driver} ({period})")
    };
    match input.currency_text(v.get("price")) {
        Some(price) => format!("{head} - {price}"),
        None => head,
    }
}

fn one_holiday(input: &FormatInput<'_>, holiday: &ChangeValue) -> String {
    if let Some(at) = holiday.as_datetime() {
        return input.date_text(Some(holiday)).unwrap_or_else(|| at.to_string());
    }
    if !holiday.is_composite() {
        return holiday.as_text().unwrap_or_default();
    }
    let name = holiday.get_any(&["name", "title"]).and_then(ChangeValue::as_text);
    let range = date_range(
        input,
        holiday.get_any(&["startDate", "start", "from"]),
        holiday.get_any(&["endDate", "end", "to"]),
    );
    match (name, range) {
        (Some(name), Some(range)) => format!("{name}: {range}"),
        (name, range) => name.or(range).unwrap_or_default(),
    }
}

pub(super) fn school_holidays(input: &FormatInput<'_>) -> String {
    let holidays = items(input.value);
    list_or(holidays.into_iter().map(|h| one_holiday(input, h)).collect(), "; ", "No holidays")
}

pub(super) fn operating_hours(input: &FormatInput<'_>) -> String {
    let v = input.value;
    if let Some(range) = time_range(v) {
        return range;
    }
    let ChangeValue::Composite(days) = v else {
        return stringify(v);
    };
    let mut keys: Vec<&String> = days.keys().collect();
    keys.sort_by_key(|k| {
        let lower = k.to_lowercase();
        (WEEKDAYS.iter().position(|d| *d == lower).unwrap_or(WEEKDAYS.len()), lower)
    });
    let rendered: Vec<String> = keys
        .into_iter()
        .filter_map(|day| {
            let hours = days.get(day)?;
            let text = match hours {
                ChangeValue::Bool(false) => "Closed".to_string(),
                ChangeValue::Absent => return None,
                other => time_range(other).or_else(|| other.as_text())?,
            };
            Some(format!("{}: {text}", upper_first(day)))
        })
        .collect();
    list_or(rendered, ", ", "No operating hours")
}

pub(super) fn special_service(input: &FormatInput<'_>) -> String {
    let v = input.value;
    let rendered = join_present(
        [
            v.get_any(&["description", "name", "title"]).and_then(ChangeValue::as_text),
            input.date_text(v.get("date")),
            v.get_any(&["pickupTime", "time"]).and_then(ChangeValue::as_text),
            input.currency_text(v.get("price")),
        ],
        " - ",
    );
    if rendered.is_empty() {
        "Special service".to_string()
    } else {
        rendered
    }
}

pub(super) fn stop(input: &FormatInput<'_>) -> String {
    let v = input.value;
    let name = v.get_any(&["name", "stopName"]).and_then(ChangeValue::as_text);
    let address = v.get("address").and_then(address_text);
    match (name, address) {
        (Some(name), Some(address)) => format!("{name} ({address})"),
        (name, address) => name.or(address).unwrap_or_else(|| "Unnamed stop".to_string()),
    }
}

pub(super) fn day_wise_student(input: &FormatInput<'_>) -> String {
    let resolver = input.resolver();
    let render_one = |v: &ChangeValue| match v {
        ChangeValue::Text(day) if is_weekday(day) => capitalize(day),
        other => resolver.resolve(other),
    };
    match input.value {
        ChangeValue::Collection(items) => list_or(items.iter().map(render_one).collect(), ", ", "None"),
        other => render_one(other),
    }
}

// ─── Generic ─────────────────────────────────────────────────────────

pub(super) fn generic_collection(input: &FormatInput<'_>) -> String {
    let rendered = items(input.value)
        .into_iter()
        .map(|item| match item {
            ChangeValue::Composite(_) => item
                .get_any(&["name", "id", "_id"])
                .and_then(ChangeValue::as_text)
                .unwrap_or_else(|| stringify(item)),
            other => stringify(other),
        })
        .collect();
    list_or(rendered, ", ", "None")
}
