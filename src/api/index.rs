// src/api/index.rs

use axum::Json;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Static JSON response for the index endpoint
static INDEX_JSON: OnceLock<Value> = OnceLock::new();

/// Handler for the index endpoint that provides API documentation
///
/// # Endpoint: GET /
///
/// # Returns
/// * `Json<Value>` - JSON response containing API endpoint documentation
pub fn index() -> Json<Value> {
    let value = INDEX_JSON.get_or_init(|| {
        json!({
            "endpoints": [
                {
                    "path": "/",
                    "method": "GET",
                    "description": "API endpoint documentation",
                    "params": {}
                },
                {
                    "path": "/intake",
                    "method": "POST",
                    "description": "Record a vendor offer as a pending purchase",
                    "params": {
                        "vendor_id": {
                            "type": "string",
                            "required": false,
                            "description": "Existing vendor id; mutually exclusive with vendor"
                        },
                        "vendor": {
                            "type": "object",
                            "required": false,
                            "description": "Inline vendor details (name, email, whatsapp_phone) for first-time sellers"
                        },
                        "acquisition_type": {
                            "type": "string",
                            "required": true,
                            "description": "consignment or buyout"
                        },
                        "items": {
                            "type": "array",
                            "required": true,
                            "description": "Offered items (description, category, asking_price), 1 to 50"
                        }
                    }
                },
                {
                    "path": "/intake/:id",
                    "method": "GET",
                    "description": "Purchase with its vendor and offered items",
                    "params": {
                        "id": {
                            "type": "string",
                            "required": true,
                            "description": "Purchase id"
                        }
                    }
                },
                {
                    "path": "/intake/:id/accept",
                    "method": "POST",
                    "description": "Accept an offer and open its inspection session (admin)",
                    "params": {
                        "inspector": {
                            "type": "string",
                            "required": true,
                            "description": "Name of the staff member performing the inspection"
                        }
                    }
                },
                {
                    "path": "/intake/:id/reject",
                    "method": "POST",
                    "description": "Reject an offer still under review (admin)",
                    "params": {}
                },
                {
                    "path": "/intake/:id/cancel",
                    "method": "POST",
                    "description": "Vendor-side cancellation before payment",
                    "params": {}
                },
                {
                    "path": "/inspections/:id",
                    "method": "GET",
                    "description": "Inspection session with its items and verifications",
                    "params": {}
                },
                {
                    "path": "/inspections/:id/items",
                    "method": "POST",
                    "description": "Register a physically received gear item",
                    "params": {
                        "pending_item_id": {
                            "type": "string",
                            "required": false,
                            "description": "The offered item this one corresponds to"
                        },
                        "serial_number": {
                            "type": "string",
                            "required": false,
                            "description": "Serial number when present on the gear"
                        },
                        "notes": {
                            "type": "string",
                            "required": false,
                            "description": "Free-form intake notes"
                        }
                    }
                },
                {
                    "path": "/inspections/:id/items/:item_id/verify",
                    "method": "POST",
                    "description": "Record the condition verification of an item (once per item)",
                    "params": {
                        "condition_grade": {
                            "type": "string",
                            "required": true,
                            "description": "a, b, c or d"
                        },
                        "functional": {
                            "type": "boolean",
                            "required": true,
                            "description": "Whether the item is fully functional"
                        },
                        "cosmetic_notes": {
                            "type": "string",
                            "required": false,
                            "description": "Cosmetic findings"
                        }
                    }
                },
                {
                    "path": "/inspections/:id/close",
                    "method": "POST",
                    "description": "Close a fully-verified session, compute the quote and send it over WhatsApp (admin)",
                    "params": {}
                },
                {
                    "path": "/purchases/:id/pricing",
                    "method": "GET",
                    "description": "Effective pricing: latest snapshot plus any override",
                    "params": {}
                },
                {
                    "path": "/purchases/:id/pricing/override",
                    "method": "POST",
                    "description": "Record a manual list-price override (admin)",
                    "params": {
                        "list_total": {
                            "type": "string",
                            "required": true,
                            "description": "Overridden list total"
                        },
                        "overridden_by": {
                            "type": "string",
                            "required": true,
                            "description": "Staff member applying the override"
                        },
                        "reason": {
                            "type": "string",
                            "required": true,
                            "description": "Why the computed price was overridden"
                        }
                    }
                },
                {
                    "path": "/purchases/:id/complete",
                    "method": "POST",
                    "description": "Complete an accepted purchase, email the payout confirmation and draft catalog items (admin)",
                    "params": {}
                },
                {
                    "path": "/quotes/:id/send",
                    "method": "POST",
                    "description": "Send or resend the WhatsApp quote for a purchase (admin)",
                    "params": {}
                },
                {
                    "path": "/webhooks/whatsapp",
                    "method": "POST",
                    "description": "Signed Kapso webhook for quote decisions; idempotent on event_id",
                    "params": {
                        "event_id": {
                            "type": "string",
                            "required": true,
                            "description": "Unique delivery id"
                        },
                        "event_type": {
                            "type": "string",
                            "required": true,
                            "description": "quote.accepted or quote.declined"
                        },
                        "data": {
                            "type": "object",
                            "required": true,
                            "description": "Decision payload carrying purchase_id"
                        }
                    }
                },
                {
                    "path": "/catalog",
                    "method": "GET",
                    "description": "Paginated published catalog",
                    "params": {
                        "page": {
                            "type": "integer",
                            "required": false,
                            "description": "Page number (starting from 1)"
                        }
                    }
                },
                {
                    "path": "/catalog",
                    "method": "POST",
                    "description": "Create a catalog item by hand (admin)",
                    "params": {
                        "sku": {
                            "type": "string",
                            "required": true,
                            "description": "Unique SKU, uppercase alphanumerics and dashes"
                        },
                        "title": {
                            "type": "string",
                            "required": true,
                            "description": "Listing title"
                        },
                        "category": {
                            "type": "string",
                            "required": true,
                            "description": "Store category"
                        },
                        "list_price": {
                            "type": "string",
                            "required": true,
                            "description": "List price"
                        }
                    }
                },
                {
                    "path": "/catalog/drafts",
                    "method": "GET",
                    "description": "Unpublished catalog drafts (admin)",
                    "params": {}
                },
                {
                    "path": "/catalog/:id",
                    "method": "GET",
                    "description": "Single catalog item",
                    "params": {}
                },
                {
                    "path": "/catalog/:id/publish",
                    "method": "POST",
                    "description": "Publish an item and queue it for WooCommerce sync (admin)",
                    "params": {}
                },
                {
                    "path": "/catalog/:id/enrich",
                    "method": "POST",
                    "description": "Run the lens-spec matcher on an item (admin)",
                    "params": {}
                },
                {
                    "path": "/catalog/:id/enrichment",
                    "method": "GET",
                    "description": "Enrichment state of an item with the matched spec",
                    "params": {}
                },
                {
                    "path": "/bundles",
                    "method": "POST",
                    "description": "Create a discounted multi-item bundle (admin)",
                    "params": {
                        "title": {
                            "type": "string",
                            "required": true,
                            "description": "Bundle title"
                        },
                        "bundle_price": {
                            "type": "string",
                            "required": true,
                            "description": "Bundle price, at most the sum of the members"
                        },
                        "catalog_item_ids": {
                            "type": "array",
                            "items": "string",
                            "required": true,
                            "description": "2 to 10 distinct catalog item ids"
                        }
                    }
                },
                {
                    "path": "/bundles/:id",
                    "method": "GET",
                    "description": "Bundle with its member items",
                    "params": {}
                },
                {
                    "path": "/consignment/:id/requests",
                    "method": "POST",
                    "description": "Vendor change request on a consignment purchase",
                    "params": {
                        "requested_by": {
                            "type": "string",
                            "required": true,
                            "description": "Who is asking"
                        },
                        "kind": {
                            "type": "string",
                            "required": true,
                            "description": "price_change or withdrawal"
                        },
                        "proposed_price": {
                            "type": "string",
                            "required": false,
                            "description": "Required for price_change, forbidden for withdrawal"
                        }
                    }
                },
                {
                    "path": "/consignment/requests/:id/approve",
                    "method": "POST",
                    "description": "Approve a pending change request (admin)",
                    "params": {}
                },
                {
                    "path": "/consignment/requests/:id/reject",
                    "method": "POST",
                    "description": "Reject a pending change request (admin)",
                    "params": {}
                },
                {
                    "path": "/sync/status",
                    "method": "GET",
                    "description": "Background catalog-sync health",
                    "params": {}
                },
                {
                    "path": "/sync/run",
                    "method": "POST",
                    "description": "Trigger a WooCommerce catalog sync outside the schedule (admin)",
                    "params": {}
                },
            ]
        })
    });

    Json(value.clone())
}
