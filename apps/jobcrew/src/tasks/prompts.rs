// All stage prompt templates. Placeholders in `{braces}` are replaced verbatim
// by the builders in tasks/mod.rs.

/// Replace: {role}, {location}, {experience}, {keywords}
pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"Search for job opportunities based on these criteria:
- Role/Position: {role}
- Location: {location}
- Experience Level: {experience}
- Keywords: {keywords}

Find at least 3-5 relevant job postings with:
- Company name
- Job title
- Key requirements
- Application link or contact info
- Salary range (if available)"#;

pub const RESEARCH_EXPECTED_OUTPUT: &str =
    "A detailed list of 3-5 job opportunities with complete information for each posting";

/// Replace: {job_description}, {current_resume}
pub const TAILOR_RESUME_PROMPT_TEMPLATE: &str = r#"Analyze this job description and provide specific suggestions for tailoring the resume:

Job Description:
{job_description}

Current Resume Summary:
{current_resume}

Provide:
1. Key skills from the job description to emphasize
2. Specific achievements or experiences to highlight
3. Keywords to include for ATS systems
4. Suggested resume summary/objective
5. Any certifications or skills to add prominence to"#;

pub const TAILOR_RESUME_EXPECTED_OUTPUT: &str =
    "Detailed resume tailoring recommendations with specific sections and keywords to emphasize";

/// Replace: {job_info}, {candidate_info}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a compelling cover letter for this position:

Job Information:
{job_info}

Candidate Background:
{candidate_info}

The cover letter should:
- Be 3-4 paragraphs
- Show genuine interest in the company and role
- Highlight relevant experience and skills
- Demonstrate cultural fit
- Include a strong call to action
- Be professional yet personable"#;

pub const COVER_LETTER_EXPECTED_OUTPUT: &str =
    "A complete, professional cover letter ready to be customized with specific names and details";

/// Replace: {applications_data}
pub const TRACK_APPLICATIONS_PROMPT_TEMPLATE: &str = r#"Organize all job application information:

Applications:
{applications_data}

Create a tracking system that includes:
1. Company name and position
2. Application date
3. Application status
4. Follow-up dates
5. Interview dates (if scheduled)
6. Notes and next steps

Present this in a clear, structured format."#;

pub const TRACK_APPLICATIONS_EXPECTED_OUTPUT: &str =
    "An organized table or structured format tracking all applications with dates and status";

/// Replace: {company_name}, {job_description}
pub const INTERVIEW_PREP_PROMPT_TEMPLATE: &str = r#"Prepare comprehensive interview materials for:

Company: {company_name}
Job Description: {job_description}

Provide:
1. Company background and recent news
2. 10 likely interview questions specific to this role
3. Suggested answers with the STAR method
4. Questions to ask the interviewer
5. Key points to emphasize about your background"#;

pub const INTERVIEW_PREP_EXPECTED_OUTPUT: &str =
    "Complete interview preparation guide with company research, questions, answers, and strategy";
